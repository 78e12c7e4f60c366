//! Register layouts the stub knows how to exchange with GDB.

pub mod xtensa;

/// Methods to read/write a flat, architecture-specific register file.
///
/// Registers must be de/serialized in the order GDB expects for the target
/// (e.g: `gdb/regformats/reg-xtensa.dat` for Xtensa). The protocol has no
/// field tagging, so the order is the only thing identifying a register.
pub trait Registers: Default {
    /// Type of the program counter.
    type ProgramCounter: Copy;

    /// Number of 32-bit words in the register file.
    const WORDS: usize;

    /// Return the value of the program counter.
    fn pc(&self) -> Self::ProgramCounter;

    /// Serialize `self` one register word at a time, in GDB order.
    fn gdb_serialize(&self, write_word: impl FnMut(u32));

    /// Overwrite `self` from a complete set of register words, in GDB order.
    ///
    /// Fails (leaving `self` untouched) unless exactly [`Self::WORDS`] words
    /// are provided.
    #[allow(clippy::result_unit_err)]
    fn gdb_deserialize(&mut self, words: &[u32]) -> Result<(), ()>;
}
