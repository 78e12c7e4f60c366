//! Traits to perform in-order, serial, byte-wise I/O.

use core::time::Duration;

mod buffered;
pub(crate) mod impls;

pub use buffered::BufferedConn;

/// A trait to perform in-order, serial, byte-wise I/O.
///
/// When the `std` feature is enabled, this trait is automatically implemented
/// for [`TcpStream`](std::net::TcpStream) and
/// [`UnixStream`](std::os::unix::net::UnixStream) (on unix systems).
pub trait Connection {
    /// Transport-specific error type.
    type Error;

    /// Write a single byte.
    fn write(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write the entire buffer, blocking until complete.
    ///
    /// This method's default implementation calls `self.write()` on each byte
    /// in the buffer. This can be quite inefficient, so if a more efficient
    /// implementation exists (such as calling `write_all()` on an underlying
    /// `std::io::Write` object), this method should be overwritten.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        for b in buf {
            self.write(*b)?;
        }
        Ok(())
    }

    /// Flush this Connection, ensuring that all intermediately buffered
    /// contents reach their destination.
    ///
    /// _Note:_ Not all `Connection`s have internal buffering (e.g: writing data
    /// to a UART TX register with FIFOs disabled). In these cases, it's fine to
    /// simply return `Ok(())`.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Called at the start of a debugging session _before_ any GDB packets have
    /// been sent/received.
    ///
    /// This method's default implementation is a no-op.
    fn on_session_start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Extends [`Connection`] with blocking and time-limited reads.
///
/// This is the only way the stub ever waits: while a session is running, the
/// stub blocks inside these methods between packets, and nowhere else.
pub trait ConnectionExt: Connection {
    /// Read a single byte, blocking until one is available.
    fn read(&mut self) -> Result<u8, Self::Error>;

    /// Read a single byte, giving up once `timeout` has elapsed.
    ///
    /// Returns `Ok(None)` if no data arrived in time. A `timeout` of `None`
    /// blocks indefinitely, just like [`read`](Self::read).
    ///
    /// Implementations MUST NOT block for (much) longer than `timeout` when
    /// one is provided.
    ///
    /// This method's default implementation ignores the timeout and falls back
    /// to `read`, which is only appropriate for transports that cannot time
    /// out.
    fn read_timeout(&mut self, timeout: Option<Duration>) -> Result<Option<u8>, Self::Error> {
        let _ = timeout;
        self.read().map(Some)
    }
}
