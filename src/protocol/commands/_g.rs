use super::prelude::*;

/// `g`: read all registers.
#[derive(PartialEq, Eq, Debug)]
pub struct g;

impl<'a> ParseCommand<'a> for g {
    // any trailing payload is ignored
    fn from_payload(_payload: &'a [u8]) -> Option<Self> {
        Some(g)
    }
}
