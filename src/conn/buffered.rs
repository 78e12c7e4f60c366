use core::time::Duration;

use super::{Connection, ConnectionExt};

/// Batches outgoing bytes before handing them to the underlying
/// [`Connection`].
///
/// Sending one byte per transport call is painfully slow over sockets, so
/// bytes are held back until a natural boundary:
///
/// - a newline, `+` or `-` is written (acks go out immediately),
/// - the buffer is full,
/// - [`flush`](Connection::flush) is called (which the stub does at the end of
///   every packet).
///
/// Buffer boundaries never affect what the host sees, only how many transport
/// writes it takes to deliver it.
pub struct BufferedConn<C, const CAP: usize = 800> {
    inner: C,
    buf: [u8; CAP],
    len: usize,
}

impl<C: Connection, const CAP: usize> BufferedConn<C, CAP> {
    /// Wrap `inner` with a `CAP`-byte output buffer.
    pub fn new(inner: C) -> Self {
        BufferedConn {
            inner,
            buf: [0; CAP],
            len: 0,
        }
    }

    /// Number of bytes waiting to be written out.
    pub fn pending(&self) -> usize {
        self.len
    }

    /// Get a mutable reference to the wrapped connection.
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Unwrap the connection, discarding any bytes that were never flushed.
    pub fn into_inner(self) -> C {
        self.inner
    }

    fn drain(&mut self) -> Result<(), C::Error> {
        if self.len > 0 {
            let len = self.len;
            // reset first, so a failed write doesn't replay stale bytes later
            self.len = 0;
            self.inner.write_all(&self.buf[..len])?;
        }
        Ok(())
    }
}

impl<C: Connection, const CAP: usize> Connection for BufferedConn<C, CAP> {
    type Error = C::Error;

    fn write(&mut self, byte: u8) -> Result<(), Self::Error> {
        if CAP == 0 {
            return self.inner.write(byte);
        }

        self.buf[self.len] = byte;
        self.len += 1;

        if matches!(byte, b'\n' | b'+' | b'-') || self.len == CAP {
            self.drain()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.drain()?;
        self.inner.flush()
    }

    fn on_session_start(&mut self) -> Result<(), Self::Error> {
        self.inner.on_session_start()
    }
}

impl<C: ConnectionExt, const CAP: usize> ConnectionExt for BufferedConn<C, CAP> {
    fn read(&mut self) -> Result<u8, Self::Error> {
        // the host can't answer bytes it never received
        self.flush()?;
        self.inner.read()
    }

    fn read_timeout(&mut self, timeout: Option<Duration>) -> Result<Option<u8>, Self::Error> {
        self.flush()?;
        self.inner.read_timeout(timeout)
    }
}
