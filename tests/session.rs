use std::collections::VecDeque;
use std::time::Duration;

use xtensa_gdbstub::arch::xtensa::{ExceptionFrame, LiveTaskContext, UNKNOWN_REGISTER};
use xtensa_gdbstub::conn::{BufferedConn, Connection, ConnectionExt};
use xtensa_gdbstub::stub::{DisconnectReason, GdbStub, GdbStubError};
use xtensa_gdbstub::target::{SliceMemory, TargetError, TargetMemory, TargetResult};

/// The scripted input ran dry.
#[derive(Debug, PartialEq)]
struct Hangup;

/// Plays back `rx` to the stub and records everything it sends.
#[derive(Default)]
struct ScriptedConn {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    /// When set, running out of input is reported as a timeout rather than as
    /// the client hanging up.
    time_out_when_empty: bool,
}

impl ScriptedConn {
    fn new(script: &[u8]) -> ScriptedConn {
        ScriptedConn {
            rx: script.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl Connection for ScriptedConn {
    type Error = Hangup;

    fn write(&mut self, byte: u8) -> Result<(), Hangup> {
        self.tx.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Hangup> {
        Ok(())
    }
}

impl ConnectionExt for ScriptedConn {
    fn read(&mut self) -> Result<u8, Hangup> {
        self.rx.pop_front().ok_or(Hangup)
    }

    fn read_timeout(&mut self, timeout: Option<Duration>) -> Result<Option<u8>, Hangup> {
        match self.rx.pop_front() {
            Some(b) => Ok(Some(b)),
            None if timeout.is_some() && self.time_out_when_empty => Ok(None),
            None => Err(Hangup),
        }
    }
}

fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

fn checksum(body: &str) -> u8 {
    body.bytes().fold(0u8, |a, b| a.wrapping_add(b))
}

/// Frame `body` as a packet. `body` must not need escaping.
fn packet(body: &str) -> String {
    format!("${}#{:02x}", body, checksum(body))
}

fn frame(exccause: u32) -> ExceptionFrame {
    let mut a = [0; 16];
    for (i, r) in a.iter_mut().enumerate() {
        *r = 0x3ffb_1000 + 0x10 * i as u32;
    }
    ExceptionFrame {
        pc: 0x400d_2bd4,
        ps: 0x0006_0030,
        a,
        exccause,
        ..Default::default()
    }
}

const RAM_BASE: u32 = 0x3ffb_0000;
const RAM: [u8; 8] = [0xef, 0xbe, 0xad, 0xde, 0x01, 0x02, 0x03, 0x04];

/// Run a session against a halted exception frame, returning the session
/// result and everything the stub sent.
fn run_session(
    script: &str,
    exccause: u32,
) -> (Result<DisconnectReason, GdbStubError<core::convert::Infallible, Hangup>>, String) {
    init_logger();

    let mut stub = GdbStub::new(ScriptedConn::new(script.as_bytes()));
    let mut mem = SliceMemory::new(RAM_BASE, &RAM);
    let res = stub.run_from_exception_frame(&frame(exccause), &mut mem);

    let tx = String::from_utf8(stub.into_connection().tx).unwrap();
    (res, tx)
}

#[test]
fn question_mark_reports_stop_signal() {
    let (res, tx) = run_session(&packet("?"), 4);

    assert!(matches!(res, Err(GdbStubError::ConnectionRead(Hangup))));
    // initial stop reply, then the ack and reply to '?'
    assert_eq!(tx, "$T02#b6+$T02#b6");
}

#[test]
fn unknown_exception_cause_is_a_segfault() {
    let (_, tx) = run_session(&packet("?"), 99);
    assert_eq!(tx, format!("{}+{}", packet("T0b"), packet("T0b")));
}

#[test]
fn write_then_read_registers() {
    let zeros = "0".repeat(840);
    let script = format!("{}{}", packet(&format!("G{}", zeros)), packet("g"));
    let (_, tx) = run_session(&script, 4);

    let expected = format!(
        "{}+{}+{}",
        packet("T02"),
        packet("OK"),
        packet(&zeros)
    );
    assert_eq!(tx, expected);
}

#[test]
fn read_registers_after_exception() {
    let (_, tx) = run_session(&packet("g"), 29);

    let regs = tx
        .strip_prefix(&format!("{}+$", packet("T0b")))
        .and_then(|s| s.get(..840))
        .unwrap();
    // pc, in target byte order
    assert_eq!(&regs[..8], "d42b0d40");
    // a0
    assert_eq!(&regs[8..16], "0010fb3f");
    // a16 onwards are unknown
    assert_eq!(&regs[8 * 17..8 * 18], "efbeadde");
    // windowbase / windowstart
    assert_eq!(&regs[8 * 69..8 * 71], "0000000001000000");
    // ps, with EXCM cleared
    assert_eq!(&regs[8 * 73..8 * 74], "20000600");
}

#[test]
fn short_register_write_is_rejected() {
    let script = format!("{}{}", packet("G0000"), packet("?"));
    let (_, tx) = run_session(&script, 4);

    assert_eq!(
        tx,
        format!("{}+{}+{}", packet("T02"), packet("E01"), packet("T02"))
    );
}

#[test]
fn read_memory() {
    let script = format!("{}{}", packet("m3ffb0000,6"), packet("m10000000,2"));
    let (_, tx) = run_session(&script, 4);

    assert_eq!(
        tx,
        format!(
            "{}+{}+{}",
            packet("T02"),
            packet("efbeadde0102"),
            packet("ffff")
        )
    );
}

#[test]
fn oversized_memory_read_is_truncated() {
    let (_, tx) = run_session(&packet("m3ffb0000,ffffffff"), 4);

    // the default 1024 byte packet buffer caps a read at 512 bytes
    let mut expected = String::from("efbeadde01020304");
    expected.push_str(&"ff".repeat(512 - RAM.len()));
    assert_eq!(tx, format!("{}+{}", packet("T02"), packet(&expected)));
}

#[test]
fn unsupported_commands_get_an_empty_reply() {
    let script = format!(
        "{}{}{}",
        packet("qSupported:multiprocess+"),
        packet("vCont?"),
        packet("m123")
    );
    let (_, tx) = run_session(&script, 4);

    assert_eq!(tx, format!("{}+$#00+$#00+$#00", packet("T02")));
}

#[test]
fn bad_checksum_is_nacked_and_session_continues() {
    let script = format!("$?#00{}", packet("?"));
    let (_, tx) = run_session(&script, 4);

    assert_eq!(tx, format!("{}-+{}", packet("T02"), packet("T02")));
}

#[test]
fn acks_and_noise_are_ignored() {
    let script = format!("+-\x03x{}", packet("?"));
    let (_, tx) = run_session(&script, 4);

    assert_eq!(tx, format!("{}+{}", packet("T02"), packet("T02")));
}

#[test]
fn oversized_packet_is_nacked() {
    let huge = format!("m{}", "0".repeat(2000));
    let script = format!("{}{}", packet(&huge), packet("?"));
    let (_, tx) = run_session(&script, 4);

    assert_eq!(tx, format!("{}-+{}", packet("T02"), packet("T02")));
}

#[test]
fn live_task_session() {
    init_logger();

    // saved frame: exit, pc, ps, a0..a15
    let mut stack = vec![0u8; 19 * 4];
    stack[4..8].copy_from_slice(&0x400d_1000u32.to_le_bytes());
    stack[12..16].copy_from_slice(&0x8000_0042u32.to_le_bytes());

    let mut stub = GdbStub::new(ScriptedConn::new(packet("g").as_bytes()));
    let mut mem = SliceMemory::new(RAM_BASE, &stack);
    let ctx = LiveTaskContext {
        stack_pointer: RAM_BASE,
        ..Default::default()
    };
    let _ = stub.run_from_live_task(ctx, &mut mem);
    let tx = String::from_utf8(stub.into_connection().tx).unwrap();

    // no exception cause: reported as a segfault
    let regs = tx
        .strip_prefix(&format!("{}+$", packet("T0b")))
        .and_then(|s| s.get(..840))
        .unwrap();
    assert_eq!(&regs[..8], "00100d40");
    assert_eq!(&regs[8..16], "42000080");
    let unknown = format!("{:08x}", UNKNOWN_REGISTER.swap_bytes());
    // lbeg
    assert_eq!(&regs[8 * 65..8 * 66], unknown);
    // ps
    assert_eq!(&regs[8 * 73..8 * 74], unknown);
}

#[test]
fn timeout_can_end_the_session() {
    init_logger();

    let mut conn = ScriptedConn::new(packet("?").as_bytes());
    conn.time_out_when_empty = true;

    let mut stub = GdbStub::builder(conn)
        .recv_timeout(Some(Duration::from_millis(10)))
        .abandon_on_timeout(true)
        .build()
        .unwrap();
    let mut mem = SliceMemory::new(RAM_BASE, &RAM);

    let res = stub.run_from_exception_frame(&frame(4), &mut mem);
    assert!(matches!(res, Ok(DisconnectReason::Timeout)));
}

#[test]
fn custom_memory_window() {
    init_logger();

    let mut stub = GdbStub::builder(ScriptedConn::new(packet("m3ffb0000,2").as_bytes()))
        .memory_window(0x4000_0000..0x5000_0000)
        .build()
        .unwrap();
    let mut mem = SliceMemory::new(RAM_BASE, &RAM);
    let _ = stub.run_from_exception_frame(&frame(4), &mut mem);

    let tx = String::from_utf8(stub.into_connection().tx).unwrap();
    assert_eq!(tx, format!("{}+{}", packet("T02"), packet("ffff")));
}

/// Memory that fails every read fatally.
struct Broken;

impl TargetMemory for Broken {
    type Error = &'static str;

    fn read_word(&mut self, _addr: u32) -> TargetResult<u32, Self::Error> {
        Err(TargetError::Fatal("bus fault"))
    }
}

#[test]
fn fatal_memory_error_ends_the_session() {
    init_logger();

    let mut stub = GdbStub::new(ScriptedConn::new(packet("m3ffb0000,1").as_bytes()));
    let res = stub.run_from_exception_frame(&frame(4), &mut Broken);

    assert!(matches!(res, Err(GdbStubError::TargetError("bus fault"))));
}

#[test]
fn buffered_connection() {
    init_logger();

    let script = format!("{}{}", packet("?"), packet("m3ffb0004,4"));
    let mut stub = GdbStub::new(BufferedConn::<_, 16>::new(ScriptedConn::new(
        script.as_bytes(),
    )));
    let mut mem = SliceMemory::new(RAM_BASE, &RAM);
    let _ = stub.run_from_exception_frame(&frame(4), &mut mem);

    let tx = String::from_utf8(stub.into_connection().into_inner().tx).unwrap();
    assert_eq!(
        tx,
        format!("{}+{}+{}", packet("T02"), packet("T02"), packet("01020304"))
    );
}
