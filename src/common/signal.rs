/// Signal numbers defined by the GDB Remote Serial Protocol.
///
/// Only the signals an Xtensa exception cause can translate into are listed.
/// The numbering is transcribed from
/// <https://github.com/bminor/binutils-gdb/blob/master/include/gdb/signals.def>
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signal(pub u8);

#[allow(clippy::upper_case_acronyms)]
#[allow(non_camel_case_types)]
#[rustfmt::skip]
impl Signal {
    #[doc = "Signal 0 (shouldn't be used)"]    pub const SIGZERO:    Self = Self(0);
    #[doc = "Interrupt"]                       pub const SIGINT:     Self = Self(2);
    #[doc = "Illegal instruction"]             pub const SIGILL:     Self = Self(4);
    #[doc = "Aborted"]                         pub const SIGABRT:    Self = Self(6);
    #[doc = "Emulation trap"]                  pub const SIGEMT:     Self = Self(7);
    #[doc = "Arithmetic exception"]            pub const SIGFPE:     Self = Self(8);
    #[doc = "Segmentation fault"]              pub const SIGSEGV:    Self = Self(11);
    #[doc = "User defined signal 2"]           pub const SIGUSR2:    Self = Self(31);
}

impl core::fmt::Display for Signal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        #[rustfmt::skip]
        let s = match *self {
            Signal::SIGZERO => "SIGZERO - Signal 0",
            Signal::SIGINT  => "SIGINT - Interrupt",
            Signal::SIGILL  => "SIGILL - Illegal instruction",
            Signal::SIGABRT => "SIGABRT - Aborted",
            Signal::SIGEMT  => "SIGEMT - Emulation trap",
            Signal::SIGFPE  => "SIGFPE - Arithmetic exception",
            Signal::SIGSEGV => "SIGSEGV - Segmentation fault",
            Signal::SIGUSR2 => "SIGUSR2 - User defined signal 2",
            _ => return write!(f, "signal {}", self.0),
        };

        write!(f, "{}", s)
    }
}
