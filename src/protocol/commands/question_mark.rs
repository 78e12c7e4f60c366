use super::prelude::*;

/// `?`: report why the target stopped.
#[derive(PartialEq, Eq, Debug)]
pub struct QuestionMark;

impl<'a> ParseCommand<'a> for QuestionMark {
    // any trailing payload is ignored
    fn from_payload(_payload: &'a [u8]) -> Option<Self> {
        Some(QuestionMark)
    }
}
