//! The core [`GdbStub`] type, used to drive a read-only GDB debugging session
//! for a halted target over a given [`Connection`].

use core::ops::Range;

use managed::ManagedSlice;

use crate::arch::xtensa::reg::{XtensaCoreRegs, REGISTER_COUNT};
use crate::arch::xtensa::{CaptureSource, ExceptionFrame, LiveTaskContext};
use crate::arch::Registers;
use crate::conn::{Connection, ConnectionExt};
use crate::protocol::recv_packet::RecvPacketBlocking;
use crate::target::TargetMemory;

mod builder;
mod core_impl;
mod error;
mod stop_reason;

pub use builder::{GdbStubBuilder, GdbStubBuilderError};
pub use core_impl::DisconnectReason;
pub use error::GdbStubError;
pub use stop_reason::exception_signal;

use core_impl::{GdbStubImpl, State};
use GdbStubError as Error;

/// Packet buffer size used when none is specified.
pub const DEFAULT_PACKET_BUFFER_SIZE: usize = 1024;

/// Smallest packet buffer able to hold a `G` packet for the full register
/// file (the opcode, plus 8 hex digits per register).
pub const MIN_PACKET_BUFFER_SIZE: usize = 1 + 8 * REGISTER_COUNT;

/// Debug a halted target using the GDB Remote Serial Protocol over a given
/// [`Connection`].
pub struct GdbStub<'a, C: Connection> {
    conn: C,
    packet_buffer: ManagedSlice<'a, u8>,
    recv: RecvPacketBlocking,
    memory_window: Range<u32>,
    abandon_on_timeout: bool,
}

impl<'a, C: Connection> GdbStub<'a, C> {
    /// Create a [`GdbStubBuilder`] using the provided Connection.
    pub fn builder(conn: C) -> GdbStubBuilder<'a, C> {
        GdbStubBuilder::new(conn)
    }

    /// Create a new `GdbStub` using the provided connection.
    ///
    /// _Note:_ `new` is only available when the `alloc` feature is enabled, as
    /// it will use a dynamically allocated `Vec` as a packet buffer.
    ///
    /// For fine-grained control over various `GdbStub` options, including the
    /// ability to specify a fixed-size buffer, use the [`GdbStub::builder`]
    /// method instead.
    #[cfg(feature = "alloc")]
    pub fn new(conn: C) -> GdbStub<'a, C> {
        GdbStub {
            conn,
            packet_buffer: ManagedSlice::Owned(alloc::vec![0; DEFAULT_PACKET_BUFFER_SIZE]),
            recv: RecvPacketBlocking::new(None),
            memory_window: crate::target::DEFAULT_MEMORY_WINDOW,
            abandon_on_timeout: false,
        }
    }

    /// Get a mutable reference to the underlying connection.
    pub fn conn_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    /// Tear down the stub, returning the underlying connection.
    pub fn into_connection(self) -> C {
        self.conn
    }
}

impl<'a, C: ConnectionExt> GdbStub<'a, C> {
    /// Run a debugging session for a target that stopped on an exception.
    ///
    /// See [`run_blocking`](Self::run_blocking).
    pub fn run_from_exception_frame<M: TargetMemory>(
        &mut self,
        frame: &ExceptionFrame,
        mem: &mut M,
    ) -> Result<DisconnectReason, Error<M::Error, C::Error>> {
        self.run_blocking(CaptureSource::ExceptionFrame(frame), mem)
    }

    /// Run a debugging session for a task that was halted from the outside.
    ///
    /// See [`run_blocking`](Self::run_blocking).
    pub fn run_from_live_task<M: TargetMemory>(
        &mut self,
        ctx: LiveTaskContext,
        mem: &mut M,
    ) -> Result<DisconnectReason, Error<M::Error, C::Error>> {
        self.run_blocking(CaptureSource::LiveTask(ctx), mem)
    }

    /// Start a GDB remote debugging session.
    ///
    /// The register snapshot is captured from `source`, the stop reason is
    /// sent to the client unprompted, and the stub then answers requests
    /// until the connection fails, `mem` reports a fatal error, or (if so
    /// configured) the client goes quiet for longer than the receive timeout.
    ///
    /// The target is never resumed. Each call starts a fresh session, with a
    /// fresh register snapshot.
    pub fn run_blocking<M: TargetMemory>(
        &mut self,
        source: CaptureSource<'_>,
        mem: &mut M,
    ) -> Result<DisconnectReason, Error<M::Error, C::Error>> {
        let regs = XtensaCoreRegs::capture(source, mem, &self.memory_window)
            .map_err(Error::TargetError)?;
        debug!("starting session from {:?}, pc={:#010x}", source, regs.pc());

        self.conn.on_session_start().map_err(Error::ConnectionInit)?;

        // each byte of an `m` reply takes two hex digits
        let max_read_len = (self.packet_buffer.len() / 2).min(u32::MAX as usize) as u32;
        let mut inner = GdbStubImpl::new(
            regs,
            self.memory_window.clone(),
            max_read_len,
            self.abandon_on_timeout,
        );

        let res = self.run_session(&mut inner, mem);
        if let Err(e) = &res {
            let kind = match e {
                Error::ConnectionInit(_) => "connection init",
                Error::ConnectionRead(_) => "connection read",
                Error::ConnectionWrite(_) => "connection write",
                Error::TargetError(_) => "target",
            };
            error!("debugging session ended: fatal {} error", kind);
        }
        res
    }

    fn run_session<M: TargetMemory>(
        &mut self,
        inner: &mut GdbStubImpl,
        mem: &mut M,
    ) -> Result<DisconnectReason, Error<M::Error, C::Error>> {
        inner.report_stop_reason(&mut self.conn)?;

        loop {
            let packet = self.recv.recv(&mut self.packet_buffer, &mut self.conn)?;
            match inner.handle_packet(&mut self.conn, mem, packet)? {
                State::Pump => {}
                State::Disconnect(reason) => return Ok(reason),
            }
        }
    }
}
