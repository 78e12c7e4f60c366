use crate::arch::xtensa::reg::{XtensaCoreRegs, REGISTER_COUNT};
use crate::arch::Registers;
use crate::conn::Connection;
use crate::protocol::commands::G;
use crate::protocol::common::hex::{swap_word, DecodeHexError, HexCursor};
use crate::protocol::{Command, ResponseWriter};
use crate::stub::error::GdbStubError as Error;
use crate::stub::stop_reason::{exception_signal, write_stop_reply};
use crate::target::{read_byte, TargetMemory};

use super::GdbStubImpl;

/// Decode a `G` payload: exactly one 8-digit word per register, each in
/// target byte order.
fn decode_registers(cmd: &G<'_>) -> Result<[u32; REGISTER_COUNT], DecodeHexError> {
    let mut words = [0u32; REGISTER_COUNT];
    let mut body = HexCursor::new(cmd.regs);

    for word in words.iter_mut() {
        *word = swap_word(body.decode(32)?);
    }

    if !body.remaining().is_empty() {
        return Err(DecodeHexError::Malformed);
    }

    Ok(words)
}

impl GdbStubImpl {
    pub(super) fn handle_base<C: Connection, M: TargetMemory>(
        &mut self,
        res: &mut ResponseWriter<'_, C>,
        mem: &mut M,
        command: Command<'_>,
    ) -> Result<(), Error<M::Error, C::Error>> {
        match command {
            Command::QuestionMark(_) => {
                write_stop_reply(res, exception_signal(self.regs.exccause))?;
            }
            Command::g(_) => {
                let mut err = Ok(());
                self.regs.gdb_serialize(|word| {
                    if err.is_ok() {
                        err = res.write_hex(swap_word(word).into(), 32);
                    }
                });
                err?;
            }
            Command::G(cmd) => {
                match decode_registers(&cmd) {
                    Ok(words) if self.regs.gdb_deserialize(&words).is_ok() => {
                        res.write_str("OK")?;
                    }
                    res_words => {
                        warn!(
                            "rejecting 'G' packet ({} hex digits, expected {}): {:?}",
                            cmd.regs.len(),
                            XtensaCoreRegs::WORDS * 8,
                            res_words.err()
                        );
                        res.write_str("E01")?;
                    }
                }
            }
            Command::m(cmd) => {
                let len = cmd.len.min(self.max_read_len);
                if len < cmd.len {
                    debug!("truncating {} byte read to {} bytes", cmd.len, len);
                }

                debug!("reading {} bytes at {:#010x}", len, cmd.addr);
                for i in 0..len {
                    let addr = cmd.addr.wrapping_add(i);
                    let byte =
                        read_byte(mem, &self.memory_window, addr).map_err(Error::TargetError)?;
                    res.write_hex(byte.into(), 8)?;
                }
            }
            Command::Unknown(_) => {}
        }

        Ok(())
    }
}
