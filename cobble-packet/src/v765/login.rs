use crate::v765::ProtocolState;
use crate::{Packet, PacketError};

use bytes::{Buf, BufMut};
use cobble_protocol::types::{RemainingBytes, VarBytes, VarInt, VarString};
use cobble_protocol::{validation_error, ProtocolRead, ProtocolWrite};
use uuid::Uuid;

///
/// Serverbound `0x00`: opens the login exchange with the client's claimed identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginStart {
    ///
    /// The claimed player name. In offline mode this is taken at face value.
    pub name: VarString,

    ///
    /// The claimed UUID. Offline-mode servers ignore it and derive their own.
    pub uuid: Uuid,
}

impl Packet for LoginStart {
    fn protocol_id() -> VarInt {
        VarInt::from(0x00)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        Ok(Self {
            name: VarString::read_from(buf)?,
            uuid: Uuid::read_from(buf)?,
        })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        self.name.write_to(buf) + self.uuid.write_to(buf)
    }

    fn len(&self) -> usize {
        self.name.len() + ProtocolWrite::len(&self.uuid)
    }
}

///
/// Serverbound `0x01`: the client's half of the encryption handshake. Accepted but unused: this
/// core never requests encryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptionResponse {
    ///
    /// The shared secret, encrypted with the server's public key.
    pub shared_secret: VarBytes,

    ///
    /// The verify token from the encryption request, encrypted likewise.
    pub verify_token: VarBytes,
}

impl Packet for EncryptionResponse {
    fn protocol_id() -> VarInt {
        VarInt::from(0x01)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        Ok(Self {
            shared_secret: VarBytes::read_from(buf)?,
            verify_token: VarBytes::read_from(buf)?,
        })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        self.shared_secret.write_to(buf) + self.verify_token.write_to(buf)
    }

    fn len(&self) -> usize {
        self.shared_secret.len() + self.verify_token.len()
    }
}

///
/// Serverbound `0x02`: the client's answer to a [`LoginPluginRequest`]. A single boolean marks
/// whether the client understood the channel; the data runs to the end of the packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginPluginResponse {
    ///
    /// Matches the message id of the request this answers.
    pub message_id: VarInt,

    ///
    /// `Some` when the client understood the request.
    pub data: Option<RemainingBytes>,
}

impl Packet for LoginPluginResponse {
    fn protocol_id() -> VarInt {
        VarInt::from(0x02)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        let message_id = VarInt::read_from(buf)?;

        let data = if bool::read_from(buf)? {
            Some(RemainingBytes::read_from(buf)?)
        } else {
            None
        };

        Ok(Self { message_id, data })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        let mut written = self.message_id.write_to(buf);
        written += self.data.is_some().write_to(buf);

        if let Some(data) = &self.data {
            written += data.write_to(buf);
        }

        written
    }

    fn len(&self) -> usize {
        self.message_id.len() + 1 + self.data.as_ref().map_or(0, ProtocolWrite::len)
    }
}

///
/// Serverbound `0x03`: the client confirms [`LoginSuccess`]; the connection moves to the
/// configuration state. Empty body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginAcknowledged;

impl Packet for LoginAcknowledged {
    fn protocol_id() -> VarInt {
        VarInt::from(0x03)
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
/// Clientbound `0x00`: kicks the client during login. The reason is a JSON text component,
/// typically `{"text":"..."}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginDisconnect {
    ///
    /// The serialized reason component.
    pub reason: VarString,
}

impl Packet for LoginDisconnect {
    fn protocol_id() -> VarInt {
        VarInt::from(0x00)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        Ok(Self {
            reason: VarString::read_from(buf)?,
        })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        self.reason.write_to(buf)
    }

    fn len(&self) -> usize {
        self.reason.len()
    }
}

///
/// Clientbound `0x01`: asks the client to begin the encryption handshake. Defined for
/// completeness; this core never sends it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptionRequest {
    ///
    /// The server id, empty on modern versions.
    pub server_id: VarString,

    ///
    /// The server's DER-encoded RSA public key.
    pub public_key: VarBytes,

    ///
    /// A nonce the client must echo back encrypted.
    pub verify_token: VarBytes,
}

impl Packet for EncryptionRequest {
    fn protocol_id() -> VarInt {
        VarInt::from(0x01)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        Ok(Self {
            server_id: VarString::read_from(buf)?,
            public_key: VarBytes::read_from(buf)?,
            verify_token: VarBytes::read_from(buf)?,
        })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        self.server_id.write_to(buf)
            + self.public_key.write_to(buf)
            + self.verify_token.write_to(buf)
    }

    fn len(&self) -> usize {
        self.server_id.len() + self.public_key.len() + self.verify_token.len()
    }
}

///
/// Clientbound `0x02`: accepts the login and hands the client its identity. The trailing
/// property list (skin signatures and the like) is always empty here, so only its zero count is
/// carried on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginSuccess {
    ///
    /// The identity the server assigned.
    pub uuid: Uuid,

    ///
    /// The accepted player name.
    pub username: VarString,
}

impl Packet for LoginSuccess {
    fn protocol_id() -> VarInt {
        VarInt::from(0x02)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        let uuid = Uuid::read_from(buf)?;
        let username = VarString::read_from(buf)?;

        if *VarInt::read_from(buf)? != 0 {
            return validation_error!(Read "non-empty property list");
        }

        Ok(Self { uuid, username })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        self.uuid.write_to(buf) + self.username.write_to(buf) + VarInt::from(0).write_to(buf)
    }

    fn len(&self) -> usize {
        ProtocolWrite::len(&self.uuid) + self.username.len() + 1
    }
}

///
/// Clientbound `0x03`: enables compression above a size threshold. Defined for completeness;
/// this core never sends it, and all frames stay uncompressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SetCompression {
    ///
    /// Minimum body size, in bytes, for a packet to be compressed.
    pub threshold: VarInt,
}

impl Packet for SetCompression {
    fn protocol_id() -> VarInt {
        VarInt::from(0x03)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        Ok(Self {
            threshold: VarInt::read_from(buf)?,
        })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        self.threshold.write_to(buf)
    }

    fn len(&self) -> usize {
        self.threshold.len()
    }
}

///
/// Clientbound `0x04`: a plugin-channel message during login. The data runs to the end of the
/// packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginPluginRequest {
    ///
    /// Identifies this request among concurrent ones.
    pub message_id: VarInt,

    ///
    /// The plugin channel name.
    pub channel: VarString,

    ///
    /// Channel-specific payload.
    pub data: RemainingBytes,
}

impl Packet for LoginPluginRequest {
    fn protocol_id() -> VarInt {
        VarInt::from(0x04)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        Ok(Self {
            message_id: VarInt::read_from(buf)?,
            channel: VarString::read_from(buf)?,
            data: RemainingBytes::read_from(buf)?,
        })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        self.message_id.write_to(buf) + self.channel.write_to(buf) + self.data.write_to(buf)
    }

    fn len(&self) -> usize {
        self.message_id.len() + self.channel.len() + ProtocolWrite::len(&self.data)
    }
}

///
/// The serverbound packets of the login state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerboundLogin {
    ///
    /// `0x00`.
    LoginStart(LoginStart),

    ///
    /// `0x01`.
    EncryptionResponse(EncryptionResponse),

    ///
    /// `0x02`.
    LoginPluginResponse(LoginPluginResponse),

    ///
    /// `0x03`.
    LoginAcknowledged(LoginAcknowledged),
}

impl ServerboundLogin {
    ///
    /// Decodes one login-state packet from a frame body (id prefix included).
    ///
    /// # Errors
    /// Returns `Err` on an unknown packet id or an invalid body.
    pub fn read<B: Buf + ?Sized>(buf: &mut B) -> Result<Self, PacketError> {
        let id = *VarInt::read_from(buf)?;

        match id {
            0x00 => Ok(Self::LoginStart(LoginStart::read_body(buf)?)),
            0x01 => Ok(Self::EncryptionResponse(EncryptionResponse::read_body(
                buf,
            )?)),
            0x02 => Ok(Self::LoginPluginResponse(LoginPluginResponse::read_body(
                buf,
            )?)),
            0x03 => Ok(Self::LoginAcknowledged(LoginAcknowledged::read_body(buf)?)),
            id => Err(PacketError::UnknownId {
                state: ProtocolState::Login,
                id,
            }),
        }
    }
}

///
/// The clientbound packets of the login state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientboundLogin {
    ///
    /// `0x00`.
    Disconnect(LoginDisconnect),

    ///
    /// `0x01`.
    EncryptionRequest(EncryptionRequest),

    ///
    /// `0x02`.
    LoginSuccess(LoginSuccess),

    ///
    /// `0x03`.
    SetCompression(SetCompression),

    ///
    /// `0x04`.
    LoginPluginRequest(LoginPluginRequest),
}

#[cfg(feature = "std")]
impl ClientboundLogin {
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
            Self::Disconnect(packet) => crate::frame::write_packet(packet, write, scratch),
            Self::EncryptionRequest(packet) => crate::frame::write_packet(packet, write, scratch),
            Self::LoginSuccess(packet) => crate::frame::write_packet(packet, write, scratch),
            Self::SetCompression(packet) => crate::frame::write_packet(packet, write, scratch),
            Self::LoginPluginRequest(packet) => {
                crate::frame::write_packet(packet, write, scratch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use cobble_protocol::id::offline_uuid;

    fn round_trip<P: Packet + PartialEq + core::fmt::Debug>(packet: &P) -> Vec<u8> {
        let mut bytes = Vec::new();
        let written = packet.write_body(&mut bytes);

        assert_eq!(written, packet.len());
        assert_eq!(written, bytes.len());

        let read = P::read_body(&mut &bytes[..]).expect("packet should decode");
        assert_eq!(&read, packet);

        bytes
    }

    #[test]
    fn login_start_round_trip() {
        round_trip(&LoginStart {
            name: VarString::from("Notch"),
            uuid: offline_uuid(b"Notch"),
        });
    }

    #[test]
    fn login_success_round_trip() {
        let bytes = round_trip(&LoginSuccess {
            uuid: offline_uuid(b"Notch"),
            username: VarString::from("Notch"),
        });

        // 16 uuid + 1 prefix + 5 name + 1 property count
        assert_eq!(bytes.len(), 23);
        assert_eq!(bytes[bytes.len() - 1], 0);
    }

    #[test]
    fn plugin_response_presence_flag() {
        let with_data = LoginPluginResponse {
            message_id: VarInt::from(7),
            data: Some(RemainingBytes(vec![1, 2, 3])),
        };

        let without_data = LoginPluginResponse {
            message_id: VarInt::from(7),
            data: None,
        };

        assert_eq!(round_trip(&with_data).len(), 5);
        assert_eq!(round_trip(&without_data).len(), 2);
    }

    #[test]
    fn dispatch_by_id() {
        let mut bytes = Vec::new();
        LoginAcknowledged::protocol_id().write_to(&mut bytes);

        let read = ServerboundLogin::read(&mut &bytes[..]).expect("packet should decode");
        assert_eq!(
            read,
            ServerboundLogin::LoginAcknowledged(LoginAcknowledged)
        );
    }

    #[test]
    fn unknown_id_rejected() {
        let bytes = [0x04u8];
        assert!(matches!(
            ServerboundLogin::read(&mut &bytes[..]),
            Err(PacketError::UnknownId {
                state: ProtocolState::Login,
                id: 0x04
            })
        ));
    }
}
