//! In-memory connection used by the unit tests.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::time::Duration;

use crate::conn::{Connection, ConnectionExt};

/// The scripted input ran dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closed;

pub struct MockConn {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub flushes: usize,
}

impl MockConn {
    pub fn new(rx: &[u8]) -> MockConn {
        MockConn {
            rx: rx.iter().copied().collect(),
            tx: Vec::new(),
            flushes: 0,
        }
    }
}

impl Connection for MockConn {
    type Error = Closed;

    fn write(&mut self, byte: u8) -> Result<(), Closed> {
        self.tx.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Closed> {
        self.flushes += 1;
        Ok(())
    }
}

impl ConnectionExt for MockConn {
    fn read(&mut self) -> Result<u8, Closed> {
        self.rx.pop_front().ok_or(Closed)
    }

    fn read_timeout(&mut self, timeout: Option<Duration>) -> Result<Option<u8>, Closed> {
        match (self.rx.pop_front(), timeout) {
            (Some(b), _) => Ok(Some(b)),
            (None, Some(_)) => Ok(None),
            (None, None) => Err(Closed),
        }
    }
}
