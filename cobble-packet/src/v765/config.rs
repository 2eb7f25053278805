use crate::v765::ProtocolState;
use crate::{Packet, PacketError};

use bytes::{Buf, BufMut};
use cobble_protocol::types::{VarInt, VarString};
use cobble_protocol::{ProtocolRead, ProtocolWrite};

///
/// Clientbound `0x01`: kicks the client during configuration. Same JSON reason shape as the
/// login-state disconnect, under this state's id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigDisconnect {
    ///
    /// The serialized reason component.
    pub reason: VarString,
}

impl Packet for ConfigDisconnect {
    fn protocol_id() -> VarInt {
        VarInt::from(0x01)
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
/// The serverbound packets of the configuration state. None are implemented by this core: every
/// incoming configuration packet dispatches to [`PacketError::UnknownId`], and the session layer
/// answers with a disconnect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerboundConfig {}

impl ServerboundConfig {
    ///
    /// Reads the packet id and rejects it; no serverbound configuration packets decode.
    ///
    /// # Errors
    /// Always returns [`PacketError::UnknownId`] (or a read error for a malformed id).
    pub fn read<B: Buf + ?Sized>(buf: &mut B) -> Result<Self, PacketError> {
        let id = *VarInt::read_from(buf)?;

        Err(PacketError::UnknownId {
            state: ProtocolState::Config,
            id,
        })
    }
}

///
/// The clientbound packets of the configuration state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientboundConfig {
    ///
    /// `0x01`.
    Disconnect(ConfigDisconnect),
}

#[cfg(feature = "std")]
impl ClientboundConfig {
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
        }
    }
}
