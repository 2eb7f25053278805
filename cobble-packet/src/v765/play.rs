use crate::v765::ProtocolState;
use crate::PacketError;

use bytes::Buf;
use cobble_protocol::types::VarInt;
use cobble_protocol::ProtocolRead;

///
/// The serverbound packets of the play state. The core implements none: the dispatch table
/// exists so the session layer gets a well-formed [`PacketError::UnknownId`] for any id rather
/// than a framing failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerboundPlay {}

impl ServerboundPlay {
    ///
    /// Reads the packet id and rejects it; no serverbound play packets decode.
    ///
    /// # Errors
    /// Always returns [`PacketError::UnknownId`] (or a read error for a malformed id).
    pub fn read<B: Buf + ?Sized>(buf: &mut B) -> Result<Self, PacketError> {
        let id = *VarInt::read_from(buf)?;

        Err(PacketError::UnknownId {
            state: ProtocolState::Play,
            id,
        })
    }
}

///
/// The clientbound packets of the play state. Empty for the same reason as [`ServerboundPlay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientboundPlay {}

#[cfg(feature = "std")]
impl ClientboundPlay {
    ///
    /// Writes this packet as one whole frame. Trivially unreachable while the enum has no
    /// variants.
    pub fn write<W: std::io::Write + ?Sized>(
        &self,
        _write: &mut W,
        _scratch: &mut alloc::vec::Vec<u8>,
    ) -> Result<(), PacketError> {
        match *self {}
    }
}
