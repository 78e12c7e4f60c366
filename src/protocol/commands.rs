//! Parsing of checksum-validated packet bodies into [`Command`]s.
//!
//! A command is identified by the first byte of the packet body (its
//! "opcode"); everything after it is the command's payload.

/// Common imports used by every command parser.
mod prelude {
    pub use super::ParseCommand;
    pub use crate::protocol::common::hex::HexCursor;
}

/// Parse a command's payload (the packet body, minus its opcode).
pub trait ParseCommand<'a>: Sized {
    /// Returns `None` if the payload is malformed.
    fn from_payload(payload: &'a [u8]) -> Option<Self>;
}

macro_rules! commands {
    ($($opcode:literal => $mod:ident::$command:ident$(<$lifetime:lifetime>)?,)*) => {
        $(
            #[allow(non_snake_case, non_camel_case_types)]
            pub mod $mod;
        )*
        $(pub use $mod::$command;)*

        /// GDB commands
        #[allow(non_camel_case_types)]
        #[derive(Debug, PartialEq, Eq)]
        pub enum Command<'a> {
            $($command($command$(<$lifetime>)?),)*
            /// Any command this stub doesn't implement (including the empty
            /// packet). Holds the entire packet body.
            Unknown(&'a [u8]),
        }

        impl<'a> Command<'a> {
            pub fn from_packet_body(body: &'a [u8]) -> Result<Command<'a>, CommandParseError> {
                let (&opcode, payload) = match body.split_first() {
                    Some(split) => split,
                    None => return Ok(Command::Unknown(body)),
                };

                let command = match opcode {
                    $($opcode => {
                        let cmd = $command::from_payload(payload)
                            .ok_or(CommandParseError::MalformedCommand(opcode))?;
                        Command::$command(cmd)
                    })*
                    _ => Command::Unknown(body),
                };

                Ok(command)
            }
        }
    };
}

/// Command parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandParseError {
    /// The command's payload didn't parse. Holds the command's opcode.
    MalformedCommand(u8),
}

commands! {
    b'?' => question_mark::QuestionMark,
    b'g' => _g::g,
    b'G' => _g_upcase::G<'a>,
    b'm' => _m::m,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_first_byte() {
        assert_eq!(
            Command::from_packet_body(b"?"),
            Ok(Command::QuestionMark(QuestionMark))
        );
        assert_eq!(Command::from_packet_body(b"g"), Ok(Command::g(g)));
        assert_eq!(
            Command::from_packet_body(b"m10,2"),
            Ok(Command::m(m { addr: 0x10, len: 2 }))
        );
        assert_eq!(
            Command::from_packet_body(b"G0011"),
            Ok(Command::G(G { regs: b"0011" }))
        );
    }

    #[test]
    fn unknown_commands() {
        assert_eq!(
            Command::from_packet_body(b"qSupported:multiprocess+"),
            Ok(Command::Unknown(b"qSupported:multiprocess+"))
        );
        assert_eq!(Command::from_packet_body(b""), Ok(Command::Unknown(b"")));
        // opcodes are case sensitive
        assert_eq!(
            Command::from_packet_body(b"M0,1:00"),
            Ok(Command::Unknown(b"M0,1:00"))
        );
    }

    #[test]
    fn malformed_payload() {
        assert_eq!(
            Command::from_packet_body(b"m10"),
            Err(CommandParseError::MalformedCommand(b'm'))
        );
    }
}
