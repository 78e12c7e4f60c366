//! `Register` structs for Xtensa cores.

mod xtensa_core;

pub use xtensa_core::{Ps, XtensaCoreRegs, REGISTER_COUNT};
