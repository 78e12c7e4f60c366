pub mod hex;

use core::fmt;

/// Lightweight wrapper around `&[u8]` which denotes that the contained data is
/// (mostly) ASCII text, e.g: a packet body. Used when logging packets.
#[repr(transparent)]
pub struct Bstr<'a>(&'a [u8]);

impl<'a> From<&'a [u8]> for Bstr<'a> {
    fn from(s: &'a [u8]) -> Bstr<'a> {
        Bstr(s)
    }
}

impl AsRef<[u8]> for Bstr<'_> {
    fn as_ref(&self) -> &[u8] {
        self.0
    }
}

impl fmt::Display for Bstr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Bstr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}
