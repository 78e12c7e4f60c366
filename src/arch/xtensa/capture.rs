use core::ops::Range;

use super::reg::XtensaCoreRegs;
use crate::target::{read_aligned_word, TargetMemory};

/// Placeholder value for registers that can't be sourced from a capture.
pub const UNKNOWN_REGISTER: u32 = 0xDEAD_BEEF;

/// Registers spilled to the stack by the exception vector before the stub is
/// entered (matches ESP-IDF's `XtExcFrame`).
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionFrame {
    pub exit: u32,
    pub pc: u32,
    pub ps: u32,
    pub a: [u32; 16],
    pub sar: u32,
    pub exccause: u32,
    pub excvaddr: u32,
    pub lbeg: u32,
    pub lend: u32,
    pub lcount: u32,
}

impl ExceptionFrame {
    /// Byte offset of `pc` within a saved frame.
    pub const PC_OFFSET: u32 = 4;
    /// Byte offset of `a0` within a saved frame.
    pub const A0_OFFSET: u32 = 12;
}

/// What's known about a task that was halted without taking an exception.
///
/// The task's registers live in an [`ExceptionFrame`]-shaped block at the top
/// of its stack. Special registers can't be recovered from there, so callers
/// may pass along whatever they were able to read from hardware.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LiveTaskContext {
    /// Saved stack pointer of the halted task.
    pub stack_pointer: u32,
    /// Best-effort read of `LBEG`.
    pub lbeg: Option<u32>,
    /// Best-effort read of `LEND`.
    pub lend: Option<u32>,
    /// Best-effort read of `SAR`.
    pub sar: Option<u32>,
}

/// Where the register snapshot for a session comes from.
#[derive(Debug, Clone, Copy)]
pub enum CaptureSource<'a> {
    /// The target stopped on an exception, and its vector spilled a frame.
    ExceptionFrame(&'a ExceptionFrame),
    /// The target was halted from the outside. Lower fidelity: only `pc`,
    /// `a0..a15` and the hardware reads in the context are available.
    LiveTask(LiveTaskContext),
}

impl XtensaCoreRegs {
    /// A register file holding nothing but [`UNKNOWN_REGISTER`], apart from
    /// the window registers.
    ///
    /// By the time the stub runs, every register window has been spilled to
    /// the stack, which GDB learns from `windowbase == 0` and
    /// `windowstart == 1`.
    pub fn unknown() -> XtensaCoreRegs {
        XtensaCoreRegs {
            pc: UNKNOWN_REGISTER,
            a: [UNKNOWN_REGISTER; 64],
            lbeg: UNKNOWN_REGISTER,
            lend: UNKNOWN_REGISTER,
            lcount: UNKNOWN_REGISTER,
            sar: UNKNOWN_REGISTER,
            windowbase: 0,
            windowstart: 1,
            configid0: UNKNOWN_REGISTER,
            configid1: UNKNOWN_REGISTER,
            ps: UNKNOWN_REGISTER,
            threadptr: UNKNOWN_REGISTER,
            br: UNKNOWN_REGISTER,
            scompare1: UNKNOWN_REGISTER,
            acclo: UNKNOWN_REGISTER,
            acchi: UNKNOWN_REGISTER,
            m: [UNKNOWN_REGISTER; 4],
            exccause: UNKNOWN_REGISTER,
            f64r_lo: UNKNOWN_REGISTER,
            f64r_hi: UNKNOWN_REGISTER,
            f64s: UNKNOWN_REGISTER,
            f: [UNKNOWN_REGISTER; 16],
            fcr: UNKNOWN_REGISTER,
            fsr: UNKNOWN_REGISTER,
        }
    }

    /// Build a snapshot from a spilled exception frame.
    pub fn from_exception_frame(frame: &ExceptionFrame) -> XtensaCoreRegs {
        let mut regs = XtensaCoreRegs::unknown();

        regs.pc = frame.pc;
        regs.a[..16].copy_from_slice(&frame.a);
        regs.lbeg = frame.lbeg;
        regs.lend = frame.lend;
        regs.lcount = frame.lcount;
        regs.sar = frame.sar;
        regs.ps = frame.ps;
        regs.clear_exception_mode();
        regs.exccause = frame.exccause;

        regs
    }

    /// Build a snapshot from a halted task's saved stack frame.
    ///
    /// Words of the frame that can't be read (or that lie outside `window`)
    /// are left as [`UNKNOWN_REGISTER`].
    pub fn from_live_task<M: TargetMemory>(
        ctx: &LiveTaskContext,
        mem: &mut M,
        window: &Range<u32>,
    ) -> Result<XtensaCoreRegs, M::Error> {
        let mut regs = XtensaCoreRegs::unknown();
        let sp = ctx.stack_pointer;

        let mut read = |offset: u32| -> Result<u32, M::Error> {
            let addr = sp.wrapping_add(offset);
            Ok(read_aligned_word(&mut *mem, window, addr)?.unwrap_or(UNKNOWN_REGISTER))
        };

        regs.pc = read(ExceptionFrame::PC_OFFSET)?;
        for (i, a) in regs.a[..16].iter_mut().enumerate() {
            *a = read(ExceptionFrame::A0_OFFSET + 4 * i as u32)?;
        }

        if let Some(lbeg) = ctx.lbeg {
            regs.lbeg = lbeg;
        }
        if let Some(lend) = ctx.lend {
            regs.lend = lend;
        }
        if let Some(sar) = ctx.sar {
            regs.sar = sar;
        }

        Ok(regs)
    }

    /// Build a snapshot from either kind of capture.
    pub fn capture<M: TargetMemory>(
        source: CaptureSource<'_>,
        mem: &mut M,
        window: &Range<u32>,
    ) -> Result<XtensaCoreRegs, M::Error> {
        match source {
            CaptureSource::ExceptionFrame(frame) => {
                Ok(XtensaCoreRegs::from_exception_frame(frame))
            }
            CaptureSource::LiveTask(ctx) => XtensaCoreRegs::from_live_task(&ctx, mem, window),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{SliceMemory, DEFAULT_MEMORY_WINDOW};

    fn frame() -> ExceptionFrame {
        let mut a = [0; 16];
        for (i, r) in a.iter_mut().enumerate() {
            *r = 0x100 + i as u32;
        }
        ExceptionFrame {
            exit: 0x4000_0000,
            pc: 0x400d_1234,
            ps: 0x0006_0030,
            a,
            sar: 0x1f,
            exccause: 29,
            excvaddr: 0,
            lbeg: 0x4000_c2e0,
            lend: 0x4000_c2f6,
            lcount: 7,
        }
    }

    #[test]
    fn frame_layout() {
        assert_eq!(core::mem::size_of::<ExceptionFrame>(), 25 * 4);
    }

    #[test]
    fn from_exception_frame() {
        let regs = XtensaCoreRegs::from_exception_frame(&frame());

        assert_eq!(regs.pc, 0x400d_1234);
        assert_eq!(regs.a[0], 0x100);
        assert_eq!(regs.a[15], 0x10f);
        assert_eq!(regs.lbeg, 0x4000_c2e0);
        assert_eq!(regs.lend, 0x4000_c2f6);
        assert_eq!(regs.lcount, 7);
        assert_eq!(regs.sar, 0x1f);
        assert_eq!(regs.exccause, 29);
        // EXCM cleared
        assert_eq!(regs.ps, 0x0006_0020);
        // all windows spilled
        assert_eq!(regs.windowbase, 0);
        assert_eq!(regs.windowstart, 1);
    }

    #[test]
    fn unsourced_registers_are_unknown() {
        let regs = XtensaCoreRegs::from_exception_frame(&frame());

        assert!(regs.a[16..].iter().all(|&r| r == UNKNOWN_REGISTER));
        assert!(regs.m.iter().all(|&r| r == UNKNOWN_REGISTER));
        assert!(regs.f.iter().all(|&r| r == UNKNOWN_REGISTER));
        for r in [
            regs.configid0,
            regs.configid1,
            regs.threadptr,
            regs.br,
            regs.scompare1,
            regs.acclo,
            regs.acchi,
            regs.f64r_lo,
            regs.f64r_hi,
            regs.f64s,
            regs.fcr,
            regs.fsr,
        ] {
            assert_eq!(r, UNKNOWN_REGISTER);
        }
    }

    #[test]
    fn from_live_task() {
        let f = frame();
        let mut stack = [0u8; 25 * 4];
        stack[4..8].copy_from_slice(&f.pc.to_le_bytes());
        for (i, a) in f.a.iter().enumerate() {
            let off = 12 + 4 * i;
            stack[off..off + 4].copy_from_slice(&a.to_le_bytes());
        }

        let mut mem = SliceMemory::new(0x3ffb_0000, &stack);
        let ctx = LiveTaskContext {
            stack_pointer: 0x3ffb_0000,
            sar: Some(3),
            ..Default::default()
        };
        let regs =
            XtensaCoreRegs::from_live_task(&ctx, &mut mem, &DEFAULT_MEMORY_WINDOW).unwrap();

        assert_eq!(regs.pc, f.pc);
        assert_eq!(&regs.a[..16], &f.a[..]);
        assert_eq!(regs.sar, 3);
        assert_eq!(regs.lbeg, UNKNOWN_REGISTER);
        assert_eq!(regs.lcount, UNKNOWN_REGISTER);
        assert_eq!(regs.ps, UNKNOWN_REGISTER);
        assert_eq!(regs.exccause, UNKNOWN_REGISTER);
        assert_eq!(regs.windowbase, 0);
        assert_eq!(regs.windowstart, 1);
    }

    #[test]
    fn live_task_with_unreadable_stack() {
        let mut mem = SliceMemory::new(0x3ffb_0000, &[]);
        let ctx = LiveTaskContext {
            stack_pointer: 0x1000,
            ..Default::default()
        };
        let regs =
            XtensaCoreRegs::from_live_task(&ctx, &mut mem, &DEFAULT_MEMORY_WINDOW).unwrap();

        assert_eq!(regs.pc, UNKNOWN_REGISTER);
        assert!(regs.a.iter().all(|&r| r == UNKNOWN_REGISTER));
    }

    #[test]
    fn capture_dispatches_on_source() {
        let f = frame();
        let mut mem = SliceMemory::new(0, &[]);
        let source = CaptureSource::ExceptionFrame(&f);
        let regs = XtensaCoreRegs::capture(source, &mut mem, &DEFAULT_MEMORY_WINDOW).unwrap();
        assert_eq!(regs, XtensaCoreRegs::from_exception_frame(&f));
    }
}
