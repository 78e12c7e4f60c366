use super::prelude::*;
use crate::protocol::common::hex::is_hex;

/// `m<addr>,<len>`: read `len` bytes of memory starting at `addr`.
#[derive(PartialEq, Eq, Debug)]
pub struct m {
    pub addr: u32,
    pub len: u32,
}

impl<'a> ParseCommand<'a> for m {
    fn from_payload(payload: &'a [u8]) -> Option<Self> {
        let mut body = HexCursor::new(payload);

        if !body.peek().map_or(false, is_hex) {
            return None;
        }
        let addr = body.decode_greedy();

        if body.next_byte()? != b',' {
            return None;
        }

        if !body.peek().map_or(false, is_hex) {
            return None;
        }
        let len = body.decode_greedy();

        Some(m { addr, len })
    }
}
