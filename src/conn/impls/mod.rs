//! Implementations of the [`Connection`] trait for various built-in types.
//!
//! [`Connection`]: super::Connection
// TODO: impl Connection for all `Read + Write` (blocked on specialization)

#[cfg(feature = "alloc")]
mod boxed;

#[cfg(feature = "std")]
mod tcpstream;

#[cfg(all(feature = "std", unix))]
mod unixstream;

#[cfg(test)]
pub(crate) mod mock;

#[cfg(feature = "std")]
pub(crate) fn clamp_read_timeout(
    timeout: Option<core::time::Duration>,
) -> Option<core::time::Duration> {
    // `set_read_timeout(Some(Duration::ZERO))` is rejected by std
    timeout.map(|t| t.max(core::time::Duration::from_millis(1)))
}

#[cfg(feature = "std")]
pub(crate) fn is_timeout(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}
