//! Translation of Xtensa exception causes into GDB stop replies.

use crate::common::Signal;
use crate::conn::Connection;
use crate::protocol::{ResponseWriter, ResponseWriterError};

/// Signal reported for each of the first 16 `EXCCAUSE` values.
#[rustfmt::skip]
const EXCEPTION_SIGNALS: [Signal; 16] = [
    Signal::SIGILL,  // IllegalInstruction
    Signal::SIGUSR2, // Syscall
    Signal::SIGSEGV, // InstructionFetchError
    Signal::SIGSEGV, // LoadStoreError
    Signal::SIGINT,  // Level1Interrupt
    Signal::SIGABRT, // Alloca
    Signal::SIGFPE,  // IntegerDivideByZero
    Signal::SIGZERO, // reserved
    Signal::SIGABRT, // Privileged
    Signal::SIGEMT,  // LoadStoreAlignment
    Signal::SIGZERO, // reserved
    Signal::SIGZERO, // reserved
    Signal::SIGEMT,  // InstrPIFDataError
    Signal::SIGEMT,  // LoadStorePIFDataError
    Signal::SIGEMT,  // InstrPIFAddrError
    Signal::SIGEMT,  // LoadStorePIFAddrError
];

/// Map the target's exception cause onto the signal reported to GDB.
///
/// Only the low 7 bits of `exccause` are significant. Causes without a
/// dedicated entry are reported as [`Signal::SIGSEGV`].
pub fn exception_signal(exccause: u32) -> Signal {
    EXCEPTION_SIGNALS
        .get((exccause & 0x7f) as usize)
        .copied()
        .unwrap_or(Signal::SIGSEGV)
}

/// Write the body of a minimal `T<signal>` stop reply.
pub(crate) fn write_stop_reply<C: Connection>(
    res: &mut ResponseWriter<'_, C>,
    signal: Signal,
) -> Result<(), ResponseWriterError<C::Error>> {
    res.write(b'T')?;
    res.write_hex(signal.0.into(), 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conn::impls::mock::MockConn;

    #[test]
    fn table() {
        assert_eq!(exception_signal(0), Signal::SIGILL);
        assert_eq!(exception_signal(1), Signal::SIGUSR2);
        assert_eq!(exception_signal(4), Signal::SIGINT);
        assert_eq!(exception_signal(6), Signal::SIGFPE);
        assert_eq!(exception_signal(9), Signal::SIGEMT);
        assert_eq!(exception_signal(15), Signal::SIGEMT);
    }

    #[test]
    fn out_of_table_causes() {
        assert_eq!(exception_signal(16), Signal::SIGSEGV);
        assert_eq!(exception_signal(29), Signal::SIGSEGV);
        assert_eq!(exception_signal(99), Signal::SIGSEGV);
    }

    #[test]
    fn only_low_bits_index_the_table() {
        assert_eq!(exception_signal(0x80 | 4), Signal::SIGINT);
        assert_eq!(exception_signal(0xdead_beef), Signal::SIGSEGV);
    }

    #[test]
    fn stop_reply() {
        let mut conn = MockConn::new(b"");
        let mut res = ResponseWriter::new(&mut conn);
        write_stop_reply(&mut res, Signal::SIGUSR2).unwrap();
        res.flush().unwrap();

        assert_eq!(conn.tx, b"$T1f#eb");
    }
}
