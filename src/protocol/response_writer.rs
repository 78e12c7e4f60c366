#[cfg(feature = "trace-pkt")]
use alloc::vec::Vec;

use crate::conn::Connection;
use crate::protocol::common::hex::encode_hex;
#[cfg(feature = "trace-pkt")]
use crate::protocol::common::Bstr;

/// Newtype around a Connection error. Having a newtype allows implementing a
/// `From<ResponseWriterError<C>> for GdbStubError<T, C>`, which greatly
/// simplifies some of the error handling in the main stub.
#[derive(Debug, Clone)]
pub struct Error<C>(pub C);

/// Characters which may not appear verbatim inside a packet body.
fn needs_escape(byte: u8) -> bool {
    matches!(byte, b'#' | b'$' | b'}' | b'*')
}

/// A wrapper around [`Connection`] that frames a single outgoing packet:
/// `$<escaped body>#<checksum>`.
///
/// The `$` is sent lazily, right before the first body byte (or by
/// [`flush`](Self::flush), for an empty packet), and the running checksum
/// starts out at zero for every new `ResponseWriter`.
pub struct ResponseWriter<'a, C: Connection> {
    inner: &'a mut C,
    started: bool,
    checksum: u8,

    // buffer to log outgoing packets. only allocates if logging is enabled.
    #[cfg(feature = "trace-pkt")]
    msg: Vec<u8>,
}

impl<'a, C: Connection + 'a> ResponseWriter<'a, C> {
    /// Creates a new ResponseWriter
    pub fn new(inner: &'a mut C) -> Self {
        Self {
            inner,
            started: false,
            checksum: 0,

            #[cfg(feature = "trace-pkt")]
            msg: Vec::new(),
        }
    }

    fn start(&mut self) -> Result<(), Error<C::Error>> {
        if !self.started {
            self.started = true;
            self.inner.write(b'$').map_err(Error)?;
        }
        Ok(())
    }

    /// Consumes self, writing out the final '#' and checksum
    pub fn flush(mut self) -> Result<(), Error<C::Error>> {
        self.start()?;

        // neither the '#' nor the checksum digits count towards the checksum
        self.inner.write(b'#').map_err(Error)?;
        for c in encode_hex(self.checksum.into(), 8) {
            self.inner.write(c).map_err(Error)?;
        }

        #[cfg(feature = "trace-pkt")]
        trace!("--> ${}#{:02x}", Bstr::from(&self.msg[..]), self.checksum);

        self.inner.flush().map_err(Error)
    }

    /// Send a byte exactly as-is, accumulating it into the checksum.
    fn write_raw(&mut self, byte: u8) -> Result<(), Error<C::Error>> {
        self.start()?;

        #[cfg(feature = "trace-pkt")]
        if log_enabled!(log::Level::Trace) {
            self.msg.push(byte);
        }

        self.checksum = self.checksum.wrapping_add(byte);
        self.inner.write(byte).map_err(Error)
    }

    /// Write a single body byte, escaping it if required.
    ///
    /// Escaped bytes go out as `}` followed by `byte ^ 0x20`, and the checksum
    /// covers both of those transmitted bytes.
    pub fn write(&mut self, byte: u8) -> Result<(), Error<C::Error>> {
        if needs_escape(byte) {
            self.write_raw(b'}')?;
            self.write_raw(byte ^ 0x20)
        } else {
            self.write_raw(byte)
        }
    }

    /// Write an entire string over the connection.
    pub fn write_str(&mut self, s: &str) -> Result<(), Error<C::Error>> {
        for b in s.as_bytes().iter() {
            self.write(*b)?;
        }
        Ok(())
    }

    /// Write `value` as `bits / 4` zero-padded hex digits, most-significant
    /// nibble first.
    pub fn write_hex(&mut self, value: u64, bits: u32) -> Result<(), Error<C::Error>> {
        for c in encode_hex(value, bits) {
            self.write(c)?;
        }
        Ok(())
    }
}
