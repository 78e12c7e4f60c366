//! Common types and definitions used across the stub.

mod signal;

pub use self::signal::Signal;
