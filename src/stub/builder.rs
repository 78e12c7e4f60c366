use core::fmt::{self, Display};
use core::ops::Range;
use core::time::Duration;

use managed::ManagedSlice;

use crate::conn::Connection;
use crate::protocol::recv_packet::RecvPacketBlocking;
use crate::target::DEFAULT_MEMORY_WINDOW;

use super::{GdbStub, MIN_PACKET_BUFFER_SIZE};

/// An error which may occur when building a [`GdbStub`].
#[derive(Debug, PartialEq, Eq)]
pub enum GdbStubBuilderError {
    /// Must provide buffer using `with_packet_buffer` in `#![no_std]` mode.
    MissingPacketBuffer,
    /// Custom packet buffer size is larger than the provided buffer's length.
    PacketBufSizeMismatch,
    /// The packet buffer can't hold a `G` packet carrying the full register
    /// file.
    PacketBufTooSmall {
        /// Smallest usable packet buffer size.
        required: usize,
        /// Size that was requested.
        actual: usize,
    },
}

impl Display for GdbStubBuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::GdbStubBuilderError::*;
        match self {
            MissingPacketBuffer => write!(
                f,
                "Must provide buffer using `with_packet_buffer` in `#![no_std]` mode."
            ),
            PacketBufSizeMismatch => write!(
                f,
                "`packet_buffer_size` is larger than `with_packet_buffer`'s size."
            ),
            PacketBufTooSmall { required, actual } => write!(
                f,
                "Packet buffer of {} bytes is too small: at least {} bytes are required.",
                actual, required
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GdbStubBuilderError {}

/// Helper to construct and customize [`GdbStub`].
pub struct GdbStubBuilder<'a, C: Connection> {
    conn: C,
    packet_buffer: Option<&'a mut [u8]>,
    packet_buffer_size: Option<usize>,
    recv_timeout: Option<Duration>,
    abandon_on_timeout: bool,
    memory_window: Range<u32>,
}

impl<'a, C: Connection> GdbStubBuilder<'a, C> {
    /// Create a new `GdbStubBuilder` using the provided Connection.
    pub fn new(conn: C) -> GdbStubBuilder<'static, C> {
        GdbStubBuilder {
            conn,
            packet_buffer: None,
            packet_buffer_size: None,
            recv_timeout: None,
            abandon_on_timeout: false,
            memory_window: DEFAULT_MEMORY_WINDOW,
        }
    }

    /// Use a pre-allocated packet buffer (instead of heap-allocating).
    ///
    /// _Note:_ This method is _required_ when the `alloc` feature is disabled!
    pub fn with_packet_buffer(mut self, packet_buffer: &'a mut [u8]) -> Self {
        self.packet_buffer = Some(packet_buffer);
        self
    }

    /// Specify a custom size for the packet buffer. Defaults to 1024 bytes.
    ///
    /// When used alongside `with_packet_buffer`, the provided `size` must be
    /// less than or equal to the length of the packet buffer.
    ///
    /// The buffer must be able to hold a full `G` packet, i.e: at least
    /// [`MIN_PACKET_BUFFER_SIZE`] bytes.
    pub fn packet_buffer_size(mut self, size: usize) -> Self {
        self.packet_buffer_size = Some(size);
        self
    }

    /// Give up waiting on the next byte from the GDB client after `timeout`.
    /// Defaults to `None` (block indefinitely).
    pub fn recv_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.recv_timeout = timeout;
        self
    }

    /// End the session with [`DisconnectReason::Timeout`] once a receive
    /// times out, instead of going back to waiting. Defaults to `false`.
    ///
    /// Has no effect unless a [`recv_timeout`](Self::recv_timeout) is set.
    ///
    /// [`DisconnectReason::Timeout`]: super::DisconnectReason::Timeout
    pub fn abandon_on_timeout(mut self, abandon: bool) -> Self {
        self.abandon_on_timeout = abandon;
        self
    }

    /// Range of addresses `m` packets may read. Reads outside of it report
    /// [`UNREADABLE_BYTE`](crate::target::UNREADABLE_BYTE) without touching
    /// the target. Defaults to
    /// [`DEFAULT_MEMORY_WINDOW`](crate::target::DEFAULT_MEMORY_WINDOW).
    pub fn memory_window(mut self, window: Range<u32>) -> Self {
        self.memory_window = window;
        self
    }

    /// Build the GdbStub, returning an error if something went wrong.
    pub fn build(self) -> Result<GdbStub<'a, C>, GdbStubBuilderError> {
        let packet_buffer = match self.packet_buffer {
            Some(buf) => {
                let buf = match self.packet_buffer_size {
                    Some(custom_len) => {
                        if custom_len > buf.len() {
                            return Err(GdbStubBuilderError::PacketBufSizeMismatch);
                        } else {
                            &mut buf[..custom_len]
                        }
                    }
                    None => buf,
                };
                ManagedSlice::Borrowed(buf)
            }
            None => {
                cfg_if::cfg_if! {
                    if #[cfg(feature = "alloc")] {
                        use alloc::vec;
                        use super::DEFAULT_PACKET_BUFFER_SIZE;
                        let len = self.packet_buffer_size.unwrap_or(DEFAULT_PACKET_BUFFER_SIZE);
                        ManagedSlice::Owned(vec![0; len])
                    } else {
                        return Err(GdbStubBuilderError::MissingPacketBuffer);
                    }
                }
            }
        };

        if packet_buffer.len() < MIN_PACKET_BUFFER_SIZE {
            return Err(GdbStubBuilderError::PacketBufTooSmall {
                required: MIN_PACKET_BUFFER_SIZE,
                actual: packet_buffer.len(),
            });
        }

        Ok(GdbStub {
            conn: self.conn,
            packet_buffer,
            recv: RecvPacketBlocking::new(self.recv_timeout),
            memory_window: self.memory_window,
            abandon_on_timeout: self.abandon_on_timeout,
        })
    }
}
