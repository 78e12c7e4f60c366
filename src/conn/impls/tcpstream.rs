use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use super::{clamp_read_timeout, is_timeout};
use crate::conn::Connection;
use crate::conn::ConnectionExt;

impl Connection for TcpStream {
    type Error = std::io::Error;

    fn write(&mut self, byte: u8) -> Result<(), Self::Error> {
        Write::write_all(self, &[byte])
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        Write::write_all(self, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Write::flush(self)
    }

    fn on_session_start(&mut self) -> Result<(), Self::Error> {
        // lots of tiny packets + Nagle = painfully slow sessions
        self.set_nodelay(true)
    }
}

impl ConnectionExt for TcpStream {
    fn read(&mut self) -> Result<u8, Self::Error> {
        self.set_read_timeout(None)?;

        let mut buf = [0u8];
        Read::read_exact(self, &mut buf)?;
        Ok(buf[0])
    }

    fn read_timeout(&mut self, timeout: Option<Duration>) -> Result<Option<u8>, Self::Error> {
        self.set_read_timeout(clamp_read_timeout(timeout))?;

        let mut buf = [0u8];
        match Read::read_exact(self, &mut buf) {
            Ok(()) => Ok(Some(buf[0])),
            Err(ref e) if is_timeout(e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
