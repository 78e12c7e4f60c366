//! Access to the memory of the halted target.
//!
//! The stub never touches memory directly. Every read goes through a
//! [`TargetMemory`] implementation, and only after the address has been
//! checked against the session's readable memory window.

use core::ops::Range;

/// Byte reported for memory the stub refuses (or fails) to read.
pub const UNREADABLE_BYTE: u8 = 0xFF;

/// Default readable window: the ESP32's internal SRAM and the cached flash /
/// PSRAM mappings, but none of the peripheral or ROM address space below it.
pub const DEFAULT_MEMORY_WINDOW: Range<u32> = 0x2000_0000..0x8000_0000;

/// An error returned by a [`TargetMemory`] method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetError<E> {
    /// The word couldn't be read, but the session can carry on. The stub
    /// reports [`UNREADABLE_BYTE`] (or the unknown-register placeholder) in
    /// its place.
    NonFatal,
    /// An unrecoverable error. Ends the debugging session, and is returned
    /// from `GdbStub::run_*` as `GdbStubError::TargetError`.
    Fatal(E),
}

/// A specialized `Result` type for [`TargetMemory`] operations.
pub type TargetResult<T, E> = Result<T, TargetError<E>>;

/// Word-granular read access to the target's memory.
pub trait TargetMemory {
    /// A target-specific fatal error.
    type Error;

    /// Read the 32-bit word at `addr`, which is always 4-byte aligned.
    fn read_word(&mut self, addr: u32) -> TargetResult<u32, Self::Error>;
}

impl<M: TargetMemory + ?Sized> TargetMemory for &mut M {
    type Error = M::Error;

    fn read_word(&mut self, addr: u32) -> TargetResult<u32, Self::Error> {
        (**self).read_word(addr)
    }
}

/// Read the aligned word containing `addr`.
///
/// Returns `Ok(None)` without touching `mem` if `addr` lies outside `window`,
/// or if the read failed with [`TargetError::NonFatal`].
pub fn read_aligned_word<M: TargetMemory>(
    mem: &mut M,
    window: &Range<u32>,
    addr: u32,
) -> Result<Option<u32>, M::Error> {
    if !window.contains(&addr) {
        return Ok(None);
    }

    match mem.read_word(addr & !3) {
        Ok(word) => Ok(Some(word)),
        Err(TargetError::NonFatal) => Ok(None),
        Err(TargetError::Fatal(e)) => Err(e),
    }
}

/// Read a single byte of target memory.
///
/// The containing word is read and the byte is extracted by shifting (the
/// target is little-endian), so the target only ever sees aligned 32-bit
/// accesses.
pub fn read_byte<M: TargetMemory>(
    mem: &mut M,
    window: &Range<u32>,
    addr: u32,
) -> Result<u8, M::Error> {
    let byte = read_aligned_word(mem, window, addr)?
        .map(|word| (word >> ((addr & 3) * 8)) as u8)
        .unwrap_or(UNREADABLE_BYTE);
    Ok(byte)
}

/// Reads the memory of the CPU the stub is running on.
#[derive(Debug)]
pub struct RawMemory {
    _private: (),
}

impl RawMemory {
    /// # Safety
    ///
    /// Every aligned address within the memory window the stub is configured
    /// with must be safe to read with a volatile 32-bit load.
    pub unsafe fn new() -> RawMemory {
        RawMemory { _private: () }
    }
}

impl TargetMemory for RawMemory {
    type Error = core::convert::Infallible;

    fn read_word(&mut self, addr: u32) -> TargetResult<u32, Self::Error> {
        // SAFETY: upheld by the caller of `RawMemory::new`
        Ok(unsafe { core::ptr::read_volatile(addr as usize as *const u32) })
    }
}

/// Serves reads out of a byte slice mapped at `base`.
///
/// Reads that don't fall entirely within the slice fail with
/// [`TargetError::NonFatal`].
#[derive(Debug, Clone)]
pub struct SliceMemory<'a> {
    base: u32,
    bytes: &'a [u8],
}

impl<'a> SliceMemory<'a> {
    pub fn new(base: u32, bytes: &'a [u8]) -> SliceMemory<'a> {
        SliceMemory { base, bytes }
    }
}

impl TargetMemory for SliceMemory<'_> {
    type Error = core::convert::Infallible;

    fn read_word(&mut self, addr: u32) -> TargetResult<u32, Self::Error> {
        let start = addr.checked_sub(self.base).ok_or(TargetError::NonFatal)? as usize;
        let end = start.checked_add(4).ok_or(TargetError::NonFatal)?;
        let word = self.bytes.get(start..end).ok_or(TargetError::NonFatal)?;

        let mut buf = [0; 4];
        buf.copy_from_slice(word);
        Ok(u32::from_le_bytes(buf))
    }
}
