use super::prelude::*;

/// `G<regs>`: overwrite all registers.
///
/// The payload is kept as raw hex. It is decoded field-by-field against the
/// register layout when the command is handled, since only the layout knows
/// how many words to expect.
#[derive(PartialEq, Eq, Debug)]
pub struct G<'a> {
    pub regs: &'a [u8],
}

impl<'a> ParseCommand<'a> for G<'a> {
    fn from_payload(payload: &'a [u8]) -> Option<Self> {
        Some(G { regs: payload })
    }
}
