use num_traits::{PrimInt, Unsigned};

/// Maximum number of digits consumed by [`HexCursor::decode_greedy`].
pub const GREEDY_MAX_DIGITS: usize = 64;

/// Why a fixed-width hex decode stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeHexError {
    /// Hit the packet terminator (`#`) or the end of the buffer before the
    /// requested number of digits were read.
    EndOfPacket,
    /// Hit some other non-hex character.
    Malformed,
}

/// Convert an ASCII hex digit `[0-9a-fA-F]` into its value.
pub fn ascii2nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Check if the byte `c` is a valid hex digit `[0-9a-fA-F]`.
pub fn is_hex(c: u8) -> bool {
    ascii2nibble(c).is_some()
}

fn nibble2ascii(nibble: u8) -> u8 {
    b"0123456789abcdef"[(nibble & 0xf) as usize]
}

/// Lowercase hex digits of `value`, most-significant nibble first.
///
/// Yields exactly `bits / 4` digits, zero-padded, with no sign extension.
/// Bits of `value` above `bits` are ignored.
pub fn encode_hex(value: u64, bits: u32) -> impl Iterator<Item = u8> {
    debug_assert!(bits % 4 == 0 && bits <= 64);
    (0..bits / 4)
        .rev()
        .map(move |i| nibble2ascii((value >> (i * 4)) as u8))
}

/// Reverse the byte order of a 32-bit word.
///
/// Register words travel over the wire as target-order (little-endian) bytes,
/// while [`encode_hex`] emits the most-significant nibble first. Swapping the
/// word before encoding (and after decoding) bridges the two.
pub fn swap_word(word: u32) -> u32 {
    word.swap_bytes()
}

/// A read cursor over a packet body, used to pull hex-encoded integers out of
/// a packet one field at a time.
#[derive(Debug, Clone)]
pub struct HexCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> HexCursor<'a> {
    pub fn new(buf: &'a [u8]) -> HexCursor<'a> {
        HexCursor { buf, pos: 0 }
    }

    /// The byte under the cursor, without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// Consume and return the byte under the cursor.
    pub fn next_byte(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Everything the cursor hasn't consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Decode exactly `bits / 4` hex digits into an unsigned integer.
    ///
    /// Every character looked at is consumed, including the one that caused
    /// an error. Running off the end of the buffer is reported the same way as
    /// reaching a `#`.
    pub fn decode<I>(&mut self, bits: u32) -> Result<I, DecodeHexError>
    where
        I: PrimInt + Unsigned + From<u8>,
    {
        let mut v = I::zero();
        for _ in 0..bits / 4 {
            let c = self.next_byte().ok_or(DecodeHexError::EndOfPacket)?;
            match ascii2nibble(c) {
                Some(nibble) => v = (v << 4) | <I as From<u8>>::from(nibble),
                None if c == b'#' => return Err(DecodeHexError::EndOfPacket),
                None => return Err(DecodeHexError::Malformed),
            }
        }
        Ok(v)
    }

    /// Decode as many hex digits as are available (up to
    /// [`GREEDY_MAX_DIGITS`]), stopping in front of the first non-hex
    /// character so the caller can inspect it.
    ///
    /// Digits beyond the width of `I` shift the high bits out.
    pub fn decode_greedy<I>(&mut self) -> I
    where
        I: PrimInt + Unsigned + From<u8>,
    {
        let mut v = I::zero();
        for _ in 0..GREEDY_MAX_DIGITS {
            match self.peek().and_then(ascii2nibble) {
                Some(nibble) => {
                    self.pos += 1;
                    v = (v << 4) | <I as From<u8>>::from(nibble);
                }
                None => break,
            }
        }
        v
    }
}
