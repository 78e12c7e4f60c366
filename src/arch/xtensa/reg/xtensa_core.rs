use bitflags::bitflags;

use crate::arch::Registers;

/// Number of 32-bit words in [`XtensaCoreRegs`].
pub const REGISTER_COUNT: usize = 105;

bitflags! {
    /// Bits of the Xtensa processor status (`PS`) register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ps: u32 {
        /// Interrupt level mask.
        const INTLEVEL = 0xf;
        /// Exception mode. Set by hardware on exception entry.
        const EXCM = 1 << 4;
        /// User vector mode.
        const UM = 1 << 5;
        /// Window overflow-detection enable.
        const WOE = 1 << 18;
    }
}

/// Xtensa LX6 registers, in the order GDB's `reg-xtensa.dat` lays them out.
///
/// Registers which can't be sourced from a capture carry
/// [`UNKNOWN_REGISTER`](crate::arch::xtensa::UNKNOWN_REGISTER).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct XtensaCoreRegs {
    /// Program counter
    pub pc: u32,
    /// Physical address registers. Only `a[0..16]` (the current window) are
    /// ever populated from a capture.
    pub a: [u32; 64],
    /// Loop begin
    pub lbeg: u32,
    /// Loop end
    pub lend: u32,
    /// Loop count
    pub lcount: u32,
    /// Shift amount register
    pub sar: u32,
    /// Window base
    pub windowbase: u32,
    /// Window start
    pub windowstart: u32,
    /// Config ID 0
    pub configid0: u32,
    /// Config ID 1
    pub configid1: u32,
    /// Processor status
    pub ps: u32,
    /// Thread pointer
    pub threadptr: u32,
    /// Boolean register
    pub br: u32,
    /// Compare value for `s32c1i`
    pub scompare1: u32,
    /// MAC16 accumulator (low)
    pub acclo: u32,
    /// MAC16 accumulator (high)
    pub acchi: u32,
    /// MAC16 data registers
    pub m: [u32; 4],
    /// Exception cause
    pub exccause: u32,
    /// Double precision emulation: result (low)
    pub f64r_lo: u32,
    /// Double precision emulation: result (high)
    pub f64r_hi: u32,
    /// Double precision emulation: status
    pub f64s: u32,
    /// Floating point registers
    pub f: [u32; 16],
    /// Floating point control
    pub fcr: u32,
    /// Floating point status
    pub fsr: u32,
}

impl Default for XtensaCoreRegs {
    fn default() -> Self {
        XtensaCoreRegs {
            pc: 0,
            a: [0; 64],
            lbeg: 0,
            lend: 0,
            lcount: 0,
            sar: 0,
            windowbase: 0,
            windowstart: 0,
            configid0: 0,
            configid1: 0,
            ps: 0,
            threadptr: 0,
            br: 0,
            scompare1: 0,
            acclo: 0,
            acchi: 0,
            m: [0; 4],
            exccause: 0,
            f64r_lo: 0,
            f64r_hi: 0,
            f64s: 0,
            f: [0; 16],
            fcr: 0,
            fsr: 0,
        }
    }
}

impl XtensaCoreRegs {
    /// Every register, in wire order.
    fn words_mut(&mut self) -> impl Iterator<Item = &mut u32> + '_ {
        use core::iter::once;

        once(&mut self.pc)
            .chain(self.a.iter_mut())
            .chain(once(&mut self.lbeg))
            .chain(once(&mut self.lend))
            .chain(once(&mut self.lcount))
            .chain(once(&mut self.sar))
            .chain(once(&mut self.windowbase))
            .chain(once(&mut self.windowstart))
            .chain(once(&mut self.configid0))
            .chain(once(&mut self.configid1))
            .chain(once(&mut self.ps))
            .chain(once(&mut self.threadptr))
            .chain(once(&mut self.br))
            .chain(once(&mut self.scompare1))
            .chain(once(&mut self.acclo))
            .chain(once(&mut self.acchi))
            .chain(self.m.iter_mut())
            .chain(once(&mut self.exccause))
            .chain(once(&mut self.f64r_lo))
            .chain(once(&mut self.f64r_hi))
            .chain(once(&mut self.f64s))
            .chain(self.f.iter_mut())
            .chain(once(&mut self.fcr))
            .chain(once(&mut self.fsr))
    }

    /// Clear `PS.EXCM`, so GDB sees the status as it was before the exception
    /// was taken.
    pub fn clear_exception_mode(&mut self) {
        let mut ps = Ps::from_bits_retain(self.ps);
        ps.remove(Ps::EXCM);
        self.ps = ps.bits();
    }
}

impl Registers for XtensaCoreRegs {
    type ProgramCounter = u32;

    const WORDS: usize = REGISTER_COUNT;

    fn pc(&self) -> Self::ProgramCounter {
        self.pc
    }

    fn gdb_serialize(&self, mut write_word: impl FnMut(u32)) {
        // walks a scratch copy, so one field list drives both directions
        let mut regs = self.clone();
        for reg in regs.words_mut() {
            write_word(*reg);
        }
    }

    fn gdb_deserialize(&mut self, words: &[u32]) -> Result<(), ()> {
        if words.len() != Self::WORDS {
            return Err(());
        }

        for (reg, word) in self.words_mut().zip(words) {
            *reg = *word;
        }

        Ok(())
    }
}
