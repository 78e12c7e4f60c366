//! Serves a synthetic, halted Xtensa target over TCP.
//!
//! ```text
//! cargo run --example tcp_halted_target
//! xtensa-esp32-elf-gdb -ex 'target remote :9001'
//! ```

use std::net::{TcpListener, TcpStream};

use xtensa_gdbstub::arch::xtensa::ExceptionFrame;
use xtensa_gdbstub::conn::BufferedConn;
use xtensa_gdbstub::stub::{DisconnectReason, GdbStub};
use xtensa_gdbstub::target::SliceMemory;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Where the fake DRAM image is mapped.
const DRAM_BASE: u32 = 0x3ffb_0000;

/// `EXCCAUSE` for a load/store error, i.e: a null pointer dereference.
const LOAD_STORE_ERROR: u32 = 3;

fn wait_for_tcp(port: u16) -> DynResult<TcpStream> {
    let sockaddr = format!("127.0.0.1:{}", port);
    eprintln!("Waiting for a GDB connection on {:?}...", sockaddr);

    let sock = TcpListener::bind(sockaddr)?;
    let (stream, addr) = sock.accept()?;
    eprintln!("Debugger connected from {}", addr);

    Ok(stream)
}

/// A frame that looks like a task faulted while storing through a null
/// pointer held in `a2`.
fn faulted_frame() -> ExceptionFrame {
    let mut a = [0; 16];
    a[0] = 0x800d_1a2c; // return address (window call size in the top bits)
    a[1] = DRAM_BASE + 0x1f0; // stack pointer
    a[2] = 0;
    a[3] = 0xcafe_f00d;

    ExceptionFrame {
        exit: 0x4008_2f34,
        pc: 0x400d_1a40,
        ps: 0x0006_0f30,
        a,
        sar: 0x18,
        exccause: LOAD_STORE_ERROR,
        excvaddr: 0,
        lbeg: 0x4000_c2e0,
        lend: 0x4000_c2f6,
        lcount: 0,
    }
}

fn main() -> DynResult<()> {
    pretty_env_logger::init();

    // some recognizable bytes to look at with `x/16xw 0x3ffb0000`
    let dram: Vec<u8> = (0..0x200u32).map(|i| (i * 7) as u8).collect();
    let mut mem = SliceMemory::new(DRAM_BASE, &dram);
    let frame = faulted_frame();

    loop {
        let conn = BufferedConn::<_>::new(wait_for_tcp(9001)?);
        let mut stub = GdbStub::builder(conn).build()?;

        match stub.run_from_exception_frame(&frame, &mut mem) {
            Ok(DisconnectReason::Timeout) => eprintln!("Debugger went quiet"),
            Ok(reason) => eprintln!("Session ended: {:?}", reason),
            // GDB hanging up shows up as a read error
            Err(e) => eprintln!("Session ended: {}", e),
        }
    }
}
