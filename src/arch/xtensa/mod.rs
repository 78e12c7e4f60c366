//! Implementation for the Xtensa LX6 cores found on ESP32-class chips.

pub mod reg;

mod capture;

pub use capture::{CaptureSource, ExceptionFrame, LiveTaskContext, UNKNOWN_REGISTER};
