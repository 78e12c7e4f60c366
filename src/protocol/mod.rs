//! Wire-level implementation of the GDB Remote Serial Protocol: framing,
//! hex encoding, and command parsing.

pub(crate) mod commands;
pub(crate) mod common;
pub(crate) mod recv_packet;
pub(crate) mod response_writer;

pub(crate) use commands::{Command, CommandParseError};
pub(crate) use response_writer::{Error as ResponseWriterError, ResponseWriter};
