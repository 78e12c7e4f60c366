use core::time::Duration;

use managed::ManagedSlice;

use crate::conn::ConnectionExt;
use crate::protocol::common::hex::HexCursor;
#[cfg(feature = "trace-pkt")]
use crate::protocol::common::Bstr;
use crate::util::managed_vec::ManagedVec;

/// Outcome of a single [`RecvPacketBlocking::recv`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum RecvPacket<'b> {
    /// A byte arrived outside of any packet (typically a bare `+` / `-` ack,
    /// or line noise). It is returned verbatim and never dispatched.
    Raw(u8),
    /// A checksum-validated packet body with all escapes resolved. The packet
    /// has already been acked with `+`.
    Packet(&'b [u8]),
    /// The claimed checksum didn't match. The packet has been nacked with `-`.
    ChecksumMismatch,
    /// The packet didn't fit into the packet buffer. The remainder of the
    /// packet has been drained, and it has been nacked with `-`.
    Overflow,
    /// The receive timeout elapsed with no data. Any partially received packet
    /// has been discarded.
    Timeout,
}

#[derive(Debug)]
pub enum RecvPacketError<C> {
    /// Error while reading from the connection.
    Read(C),
    /// Error while sending the ack / nack.
    Write(C),
}

/// Receives a single packet by pulling bytes from a blocking
/// [`ConnectionExt`], acking / nacking it as it goes.
pub struct RecvPacketBlocking {
    timeout: Option<Duration>,
}

impl RecvPacketBlocking {
    pub fn new(timeout: Option<Duration>) -> Self {
        RecvPacketBlocking { timeout }
    }

    fn get_byte<C: ConnectionExt>(
        &self,
        conn: &mut C,
    ) -> Result<Option<u8>, RecvPacketError<C::Error>> {
        conn.read_timeout(self.timeout).map_err(RecvPacketError::Read)
    }

    pub fn recv<'b, C: ConnectionExt>(
        &mut self,
        packet_buffer: &'b mut ManagedSlice<'_, u8>,
        conn: &mut C,
    ) -> Result<RecvPacket<'b>, RecvPacketError<C::Error>> {
        let header_byte = match self.get_byte(conn)? {
            Some(b) => b,
            None => return Ok(RecvPacket::Timeout),
        };

        if header_byte != b'$' {
            return Ok(RecvPacket::Raw(header_byte));
        }

        // Wrap the buf in a `ManagedVec` to keep the code readable.
        let mut buf = ManagedVec::new(packet_buffer);
        let mut checksum = 0u8;
        let mut overflow = false;

        // read the packet body
        loop {
            let mut c = match self.get_byte(conn)? {
                Some(c) => c,
                None => {
                    warn!("timed out mid-packet, dropping {} bytes", buf.len());
                    return Ok(RecvPacket::Timeout);
                }
            };

            match c {
                b'#' => break,
                b'$' => {
                    // the host gave up on whatever it was sending: start over
                    debug!("packet restarted after {} bytes", buf.len());
                    buf.clear();
                    checksum = 0;
                    overflow = false;
                    continue;
                }
                b'}' => {
                    checksum = checksum.wrapping_add(c);
                    c = match self.get_byte(conn)? {
                        Some(c) => c,
                        None => {
                            warn!("timed out mid-packet, dropping {} bytes", buf.len());
                            return Ok(RecvPacket::Timeout);
                        }
                    };
                    checksum = checksum.wrapping_add(c);
                    c ^= 0x20;
                }
                _ => checksum = checksum.wrapping_add(c),
            }

            // keep draining once full, so the stream stays in sync
            if buf.push(c).is_err() {
                overflow = true;
            }
        }

        // read the claimed checksum
        let mut claimed = [0u8; 2];
        for b in claimed.iter_mut() {
            *b = match self.get_byte(conn)? {
                Some(b) => b,
                None => {
                    warn!("timed out waiting for checksum");
                    return Ok(RecvPacket::Timeout);
                }
            };
        }

        if overflow {
            warn!(
                "packet exceeds the {} byte packet buffer, rejecting it",
                buf.capacity()
            );
            conn.write(b'-').map_err(RecvPacketError::Write)?;
            return Ok(RecvPacket::Overflow);
        }

        let len = buf.len();
        drop(buf);
        let body: &'b [u8] = &packet_buffer[..len];

        #[cfg(feature = "trace-pkt")]
        trace!("<-- ${}#{}", Bstr::from(body), Bstr::from(&claimed[..]));

        match HexCursor::new(&claimed).decode::<u8>(8) {
            Ok(claimed) if claimed == checksum => {
                conn.write(b'+').map_err(RecvPacketError::Write)?;
                Ok(RecvPacket::Packet(body))
            }
            claimed => {
                warn!(
                    "checksum mismatch: claimed {:?}, calculated {:02x}",
                    claimed, checksum
                );
                conn.write(b'-').map_err(RecvPacketError::Write)?;
                Ok(RecvPacket::ChecksumMismatch)
            }
        }
    }
}
