use crate::v765::ProtocolState;
use crate::{Packet, PacketError};

use bytes::{Buf, BufMut};
use cobble_protocol::types::{VarInt, VarString};
use cobble_protocol::{validation_error, ProtocolRead, ProtocolWrite};

///
/// The single byte a pre-Netty ("legacy") client opens its server list ping with. It can never
/// begin a valid frame: as a length prefix it would exceed [`crate::MAX_PACKET_LEN`].
pub const LEGACY_PING_SENTINEL: u8 = 0xFE;

///
/// The state the client asks to move to after the handshake.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NextState {
    ///
    /// Server list ping.
    Status,

    ///
    /// Join the game.
    Login,
}

impl From<NextState> for ProtocolState {
    fn from(value: NextState) -> Self {
        match value {
            NextState::Status => ProtocolState::Status,
            NextState::Login => ProtocolState::Login,
        }
    }
}

impl ProtocolRead for NextState {
    type Output = Self;

    fn read_from<B: Buf + ?Sized>(read: &mut B) -> cobble_protocol::Result<Self> {
        match *VarInt::read_from(read)? {
            1 => Ok(NextState::Status),
            2 => Ok(NextState::Login),
            _ => validation_error!(Read "invalid next-state value"),
        }
    }
}

impl ProtocolWrite for NextState {
    fn write_to<B: BufMut + ?Sized>(&self, write: &mut B) -> usize {
        let id = match self {
            NextState::Status => 1,
            NextState::Login => 2,
        };

        VarInt::from(id).write_to(write)
    }

    fn len(&self) -> usize {
        1
    }
}

///
/// Serverbound `0x00`: the first packet of every modern connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handshake {
    ///
    /// The client's protocol version. This implementation only speaks
    /// [`crate::v765::PROTOCOL_VERSION`], but the handshake decodes regardless.
    pub protocol_version: VarInt,

    ///
    /// The address the client believes it connected to.
    pub server_address: VarString,

    ///
    /// The port the client believes it connected to.
    pub server_port: u16,

    ///
    /// Which state to enter next.
    pub next_state: NextState,
}

impl Packet for Handshake {
    fn protocol_id() -> VarInt {
        VarInt::from(0x00)
    }

    fn read_body<B>(buf: &mut B) -> crate::Result<Self>
    where
        B: Buf + ?Sized,
    {
        Ok(Self {
            protocol_version: VarInt::read_from(buf)?,
            server_address: VarString::read_from(buf)?,
            server_port: u16::read_from(buf)?,
            next_state: NextState::read_from(buf)?,
        })
    }

    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized,
    {
        self.protocol_version.write_to(buf)
            + self.server_address.write_to(buf)
            + self.server_port.write_to(buf)
            + self.next_state.write_to(buf)
    }

    fn len(&self) -> usize {
        self.protocol_version.len()
            + self.server_address.len()
            + self.server_port.len()
            + self.next_state.len()
    }
}

///
/// The serverbound packets of the handshake state.
///
/// The [`Legacy`](ServerboundHandshake::Legacy) variant is produced when the connection opens
/// with [`LEGACY_PING_SENTINEL`] instead of a frame; the connection is to be closed without a
/// reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerboundHandshake {
    ///
    /// `0x00`.
    Handshake(Handshake),

    ///
    /// A pre-Netty client's ping, not a real packet.
    Legacy,
}

impl ServerboundHandshake {
    ///
    /// Decodes one handshake-state packet from a frame body (id prefix included).
    ///
    /// # Errors
    /// Returns `Err` on an unknown packet id or an invalid body.
    pub fn read<B: Buf + ?Sized>(buf: &mut B) -> Result<Self, PacketError> {
        let id = *VarInt::read_from(buf)?;

        match id {
            0x00 => Ok(Self::Handshake(Handshake::read_body(buf)?)),
            id => Err(PacketError::UnknownId {
                state: ProtocolState::Handshake,
                id,
            }),
        }
    }
}
