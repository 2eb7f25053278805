use crate::{Packet, PacketError, MAX_PACKET_LEN, MIN_PACKET_LEN};

use alloc::vec::Vec;
use cobble_protocol::types::{validate_len, VarInt};
use cobble_protocol::util::{self, VarIntDecoder};
use cobble_protocol::{validation_error, ProtocolWrite};
use std::io::{Read, Write};

use crate::v765::handshake::LEGACY_PING_SENTINEL;

///
/// Result of the first read on a fresh connection, which must distinguish a real frame from a
/// pre-Netty client's probe. See [`read_frame_or_legacy`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InitialFrame {
    ///
    /// A frame was read into the scratch buffer.
    Frame,

    ///
    /// The connection opened with [`LEGACY_PING_SENTINEL`]. Nothing was read into the scratch
    /// buffer; the connection should be closed without a reply.
    Legacy,
}

fn read_byte<R: Read + ?Sized>(read: &mut R) -> std::io::Result<u8> {
    let mut byte = [0u8; 1];
    read.read_exact(&mut byte)?;
    Ok(byte[0])
}

///
/// Reads a frame-length VarInt byte-by-byte. `first` carries a byte the caller already pulled
/// off the stream, if any.
fn read_frame_len<R: Read + ?Sized>(
    read: &mut R,
    first: Option<u8>,
) -> Result<i32, PacketError> {
    let mut decoder = VarIntDecoder::new();
    let mut pending = first;

    loop {
        let byte = match pending.take() {
            Some(byte) => byte,
            None => read_byte(read)?,
        };

        // an overlong prefix errors inside the decoder before any frame bytes are pulled
        if let Some(len) = decoder.feed(byte)? {
            return Ok(len);
        }
    }
}

fn fill_scratch<R: Read + ?Sized>(
    read: &mut R,
    scratch: &mut Vec<u8>,
    len: i32,
) -> Result<(), PacketError> {
    validate_len(len, MIN_PACKET_LEN, MAX_PACKET_LEN)?;

    scratch.clear();
    scratch.resize(len as usize, 0);
    read.read_exact(scratch)?;

    Ok(())
}

///
/// Reads one length-prefixed frame into `scratch`, replacing its contents. On return the scratch
/// buffer holds exactly the declared number of bytes (packet id plus body), so the stream is
/// left aligned on the next frame boundary even if the packet decoder consumes less.
///
/// Blocks until the whole frame has arrived.
///
/// # Errors
/// Returns `Err` on transport failure (including EOF mid-frame), an overlong length prefix, or a
/// declared length outside `[MIN_PACKET_LEN, MAX_PACKET_LEN]`.
pub fn read_frame<R: Read + ?Sized>(
    read: &mut R,
    scratch: &mut Vec<u8>,
) -> Result<(), PacketError> {
    let len = read_frame_len(read, None)?;
    fill_scratch(read, scratch, len)
}

///
/// Like [`read_frame`], but for the very first read on a connection: a first byte of
/// [`LEGACY_PING_SENTINEL`] yields [`InitialFrame::Legacy`] instead of a frame.
///
/// # Errors
/// See [`read_frame`].
pub fn read_frame_or_legacy<R: Read + ?Sized>(
    read: &mut R,
    scratch: &mut Vec<u8>,
) -> Result<InitialFrame, PacketError> {
    let first = read_byte(read)?;

    if first == LEGACY_PING_SENTINEL {
        return Ok(InitialFrame::Legacy);
    }

    let len = read_frame_len(read, Some(first))?;
    fill_scratch(read, scratch, len)?;

    Ok(InitialFrame::Frame)
}

///
/// Serializes a packet (length prefix, id, body) into `scratch` and writes the whole frame with
/// a single `write_all`, so no partial packet is ever observed on the wire.
///
/// # Errors
/// Returns `Err` if the packet is larger than [`MAX_PACKET_LEN`], or on transport failure.
pub fn write_packet<P, W>(
    packet: &P,
    write: &mut W,
    scratch: &mut Vec<u8>,
) -> Result<(), PacketError>
where
    P: Packet,
    W: Write + ?Sized,
{
    let id = P::protocol_id();
    let total = ProtocolWrite::len(&id) + packet.len();

    let Ok(total) = i32::try_from(total) else {
        return Err(validation_error!(*Read "packet exceeds maximum length").into());
    };
    validate_len(total, MIN_PACKET_LEN, MAX_PACKET_LEN)?;

    scratch.clear();
    scratch.reserve(util::var_int_len(total) + total as usize);

    VarInt::from(total).write_to(scratch);
    id.write_to(scratch);
    packet.write_body(scratch);

    write.write_all(scratch)?;
    Ok(())
}
