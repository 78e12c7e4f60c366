//! A minimal, read-only implementation of the [GDB Remote Serial Protocol]
//! for inspecting a halted Xtensa (ESP32-class) target.
//!
//! The stub is meant to be entered once the target has already stopped, most
//! commonly from a panic / unhandled-exception handler. It captures a register
//! snapshot, reports why the target stopped, and then answers the GDB client's
//! requests until the transport goes away. Nothing is ever resumed.
//!
//! Supported requests:
//!
//! | Packet          | Meaning                                   |
//! |-----------------|-------------------------------------------|
//! | `?`             | report the stop reason (`T<signal>`)      |
//! | `g`             | read the whole register file              |
//! | `G<regs>`       | overwrite the in-session register file    |
//! | `m<addr>,<len>` | read target memory                        |
//!
//! Every other request gets the protocol's empty "unsupported" reply.
//!
//! ## Getting started
//!
//! 1. Pick a [`Connection`](conn::Connection) (e.g: a `TcpStream` when the
//!    `std` feature is enabled, or your own UART / socket wrapper).
//! 2. Give the stub a way to read target memory by implementing
//!    [`TargetMemory`](target::TargetMemory), or use one of the provided
//!    implementations.
//! 3. Build a [`GdbStub`](stub::GdbStub) and hand it the halted context via
//!    [`GdbStub::run_from_exception_frame`](stub::GdbStub::run_from_exception_frame)
//!    or [`GdbStub::run_from_live_task`](stub::GdbStub::run_from_live_task).
//!
//! ## Feature flags
//!
//! - `std` (default): implements `Connection` for `TcpStream` / `UnixStream`,
//!   and `std::error::Error` for the crate's error types.
//! - `alloc`: allows the packet buffer to be heap-allocated by the builder.
//! - `trace-pkt` (default): logs every incoming / outgoing packet at the
//!   `trace` level.
//!
//! Without `alloc`, the crate is fully `#![no_std]`, and a packet buffer must
//! be provided via
//! [`GdbStubBuilder::with_packet_buffer`](stub::GdbStubBuilder::with_packet_buffer).
//!
//! [GDB Remote Serial Protocol]: https://sourceware.org/gdb/onlinedocs/gdb/Remote-Protocol.html

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
extern crate log;

mod protocol;
mod util;

pub mod arch;
pub mod common;
pub mod conn;
pub mod stub;
pub mod target;
