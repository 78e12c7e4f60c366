use core::ops::Range;

use crate::arch::xtensa::reg::XtensaCoreRegs;
use crate::conn::Connection;
use crate::protocol::common::Bstr;
use crate::protocol::recv_packet::RecvPacket;
use crate::protocol::{Command, CommandParseError, ResponseWriter, ResponseWriterError};
use crate::stub::error::GdbStubError as Error;
use crate::stub::stop_reason::{exception_signal, write_stop_reply};
use crate::target::TargetMemory;

mod base;

/// Describes why the GDB session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DisconnectReason {
    /// No data arrived within the receive timeout, and the stub was
    /// configured to abandon the session when that happens.
    Timeout,
}

pub(crate) enum State {
    Pump,
    Disconnect(DisconnectReason),
}

/// Per-session state: everything here is rebuilt from scratch whenever a new
/// session starts.
pub(crate) struct GdbStubImpl {
    regs: XtensaCoreRegs,
    memory_window: Range<u32>,
    max_read_len: u32,
    abandon_on_timeout: bool,
}

impl GdbStubImpl {
    /// `max_read_len` caps the number of bytes a single `m` packet returns.
    pub fn new(
        regs: XtensaCoreRegs,
        memory_window: Range<u32>,
        max_read_len: u32,
        abandon_on_timeout: bool,
    ) -> GdbStubImpl {
        GdbStubImpl {
            regs,
            memory_window,
            max_read_len,
            abandon_on_timeout,
        }
    }

    /// Send an unsolicited stop reply, used to open the session.
    pub fn report_stop_reason<C: Connection>(
        &mut self,
        conn: &mut C,
    ) -> Result<(), ResponseWriterError<C::Error>> {
        let signal = exception_signal(self.regs.exccause);
        debug!("--> stopped with {}", signal);

        let mut res = ResponseWriter::new(conn);
        write_stop_reply(&mut res, signal)?;
        res.flush()
    }

    pub fn handle_packet<C: Connection, M: TargetMemory>(
        &mut self,
        conn: &mut C,
        mem: &mut M,
        packet: RecvPacket<'_>,
    ) -> Result<State, Error<M::Error, C::Error>> {
        match packet {
            RecvPacket::Raw(b'+') => {
                trace!("<-- +");
                Ok(State::Pump)
            }
            RecvPacket::Raw(b'-') => {
                // nothing is ever retransmitted: GDB will re-issue the request
                debug!("<-- - (retransmission not supported, ignoring)");
                Ok(State::Pump)
            }
            RecvPacket::Raw(0x03) => {
                debug!("<-- interrupt (target is already halted, ignoring)");
                Ok(State::Pump)
            }
            RecvPacket::Raw(b) => {
                debug!("<-- unexpected byte {:#04x} outside of a packet", b);
                Ok(State::Pump)
            }
            // already nacked
            RecvPacket::ChecksumMismatch | RecvPacket::Overflow => Ok(State::Pump),
            RecvPacket::Timeout => {
                if self.abandon_on_timeout {
                    warn!("no data from the GDB client, abandoning the session");
                    Ok(State::Disconnect(DisconnectReason::Timeout))
                } else {
                    Ok(State::Pump)
                }
            }
            RecvPacket::Packet(body) => {
                let command = match Command::from_packet_body(body) {
                    Ok(command) => command,
                    Err(CommandParseError::MalformedCommand(opcode)) => {
                        warn!("malformed '{}' packet, replying as unsupported", opcode as char);
                        Command::Unknown(body)
                    }
                };

                let mut res = ResponseWriter::new(conn);
                self.handle_command(&mut res, mem, command)?;
                res.flush()?;

                Ok(State::Pump)
            }
        }
    }

    fn handle_command<C: Connection, M: TargetMemory>(
        &mut self,
        res: &mut ResponseWriter<'_, C>,
        mem: &mut M,
        command: Command<'_>,
    ) -> Result<(), Error<M::Error, C::Error>> {
        match command {
            Command::Unknown(body) => {
                warn!("unsupported command: {:?}", Bstr::from(body));
                // an empty reply marks the command as unsupported
                Ok(())
            }
            command => self.handle_base(res, mem, command),
        }
    }
}
