use crate::v765::ProtocolState;
use crate::{Packet, PacketError};

use bytes::{Buf, BufMut};
use cobble_protocol::types::{VarInt, VarString};
use cobble_protocol::{ProtocolRead, ProtocolWrite};

///
/// Serverbound `0x00`: asks for the status document. Empty body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusRequest;

impl Packet for StatusRequest {
    fn protocol_id() -> VarInt {
        VarInt::from(0x00)
    }

    fn read_body<B>(_: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        Ok(Self)
    }

    fn write_body<B>(&self, _: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        0
    }

    fn len(&self) -> usize {
        0
    }
}

///
/// Serverbound `0x01`: latency probe. The payload is opaque to the server and echoed back
/// verbatim.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PingRequest {
    ///
    /// Client-chosen payload, typically a timestamp.
    pub payload: i64,
}

impl Packet for PingRequest {
    fn protocol_id() -> VarInt {
        VarInt::from(0x01)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        Ok(Self {
            payload: i64::read_from(buf)?,
        })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        self.payload.write_to(buf)
    }

    fn len(&self) -> usize {
        self.payload.len()
    }
}

///
/// Clientbound `0x00`: the status document, as a JSON string.
///
/// The JSON shape is `{ version: { name, protocol }, players: { max, online },
/// description: { text }, favicon }`. Building the document is the server's job; this packet
/// just carries it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusResponse {
    ///
    /// The serialized status document.
    pub json: VarString,
}

impl Packet for StatusResponse {
    fn protocol_id() -> VarInt {
        VarInt::from(0x00)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        Ok(Self {
            json: VarString::read_from(buf)?,
        })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        self.json.write_to(buf)
    }

    fn len(&self) -> usize {
        self.json.len()
    }
}

///
/// Clientbound `0x01`: echo of a [`PingRequest`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PingResponse {
    ///
    /// The payload from the corresponding request.
    pub payload: i64,
}

impl Packet for PingResponse {
    fn protocol_id() -> VarInt {
        VarInt::from(0x01)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        Ok(Self {
            payload: i64::read_from(buf)?,
        })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        self.payload.write_to(buf)
    }

    fn len(&self) -> usize {
        self.payload.len()
    }
}

///
/// The serverbound packets of the status state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ServerboundStatus {
    ///
    /// `0x00`.
    StatusRequest(StatusRequest),

    ///
    /// `0x01`.
    PingRequest(PingRequest),
}

impl ServerboundStatus {
    ///
    /// Decodes one status-state packet from a frame body (id prefix included).
    ///
    /// # Errors
    /// Returns `Err` on an unknown packet id or an invalid body.
    pub fn read<B: Buf + ?Sized>(buf: &mut B) -> Result<Self, PacketError> {
        let id = *VarInt::read_from(buf)?;

        match id {
            0x00 => Ok(Self::StatusRequest(StatusRequest::read_body(buf)?)),
            0x01 => Ok(Self::PingRequest(PingRequest::read_body(buf)?)),
            id => Err(PacketError::UnknownId {
                state: ProtocolState::Status,
                id,
            }),
        }
    }
}

///
/// The clientbound packets of the status state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientboundStatus {
    ///
    /// `0x00`.
    StatusResponse(StatusResponse),

    ///
    /// `0x01`.
    PingResponse(PingResponse),
}

#[cfg(feature = "std")]
impl ClientboundStatus {
    ///
    /// Writes this packet as one whole frame. See [`crate::frame::write_packet`].
    ///
    /// # Errors
    /// Returns `Err` on transport failure or an oversized packet.
    pub fn write<W: std::io::Write + ?Sized>(
        &self,
        write: &mut W,
        scratch: &mut alloc::vec::Vec<u8>,
    ) -> Result<(), PacketError> {
        match self {
            Self::StatusResponse(packet) => crate::frame::write_packet(packet, write, scratch),
            Self::PingResponse(packet) => crate::frame::write_packet(packet, write, scratch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    #[test]
    fn ping_request_round_trip() {
        let packet = PingRequest {
            payload: 1_234_567_890,
        };

        let mut bytes = Vec::new();
        PingRequest::protocol_id().write_to(&mut bytes);
        packet.write_body(&mut bytes);

        assert_eq!(bytes.len(), 9);

        let read = ServerboundStatus::read(&mut &bytes[..]).expect("packet should decode");
        assert_eq!(read, ServerboundStatus::PingRequest(packet));
    }

    #[test]
    fn status_request_is_empty() {
        let bytes = [0x00u8];
        let read = ServerboundStatus::read(&mut &bytes[..]).expect("packet should decode");

        assert_eq!(read, ServerboundStatus::StatusRequest(StatusRequest));
    }

    #[test]
    fn status_response_round_trip() {
        let packet = StatusResponse {
            json: VarString::from("{\"description\":{\"text\":\"hello\"}}"),
        };

        let mut bytes = Vec::new();
        let written = packet.write_body(&mut bytes);

        assert_eq!(written, packet.len());

        let read =
            StatusResponse::read_body(&mut &bytes[..]).expect("packet should decode");
        assert_eq!(read, packet);
    }

    #[test]
    fn unknown_id_rejected() {
        let bytes = [0x02u8];
        let err = ServerboundStatus::read(&mut &bytes[..]).unwrap_err();

        assert_eq!(
            err.to_string(),
            "unknown packet id 0x02 in state status"
        );
    }
}
