use core::fmt::{self, Debug, Display};

use crate::protocol::recv_packet::RecvPacketError;
use crate::protocol::ResponseWriterError;

/// An error which may occur during a GDB debugging session.
///
/// Per-packet problems (bad checksums, oversized packets, malformed
/// payloads) are handled inside the session and never show up here. Every
/// variant of this type ends the session.
#[derive(Debug)]
#[non_exhaustive]
pub enum GdbStubError<T, C> {
    /// Connection Error while initializing the session.
    ConnectionInit(C),
    /// Connection Error while reading request.
    ConnectionRead(C),
    /// Connection Error while writing response.
    ConnectionWrite(C),
    /// Target encountered a fatal error.
    TargetError(T),
}

impl<T, C> From<ResponseWriterError<C>> for GdbStubError<T, C> {
    fn from(e: ResponseWriterError<C>) -> Self {
        GdbStubError::ConnectionWrite(e.0)
    }
}

impl<T, C> From<RecvPacketError<C>> for GdbStubError<T, C> {
    fn from(e: RecvPacketError<C>) -> Self {
        match e {
            RecvPacketError::Read(e) => GdbStubError::ConnectionRead(e),
            RecvPacketError::Write(e) => GdbStubError::ConnectionWrite(e),
        }
    }
}

impl<T, C> Display for GdbStubError<T, C>
where
    C: Debug,
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::GdbStubError::*;
        match self {
            ConnectionInit(e) => write!(f, "Connection Error while initializing the session: {:?}", e),
            ConnectionRead(e) => write!(f, "Connection Error while reading request: {:?}", e),
            ConnectionWrite(e) => write!(f, "Connection Error while writing response: {:?}", e),
            TargetError(e) => write!(f, "Target threw a fatal error: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<T, C> std::error::Error for GdbStubError<T, C>
where
    C: Debug,
    T: Debug,
{
}
