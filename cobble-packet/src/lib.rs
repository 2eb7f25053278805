//!
//! Packet definitions for Minecraft protocol version 765 (game version 1.20.4), plus
//! length-framed packet I/O.
//!
//! The [`Packet`] trait describes a single packet body; the [`v765`] module enumerates the
//! serverbound and clientbound packets of each connection state as sum types with id-dispatching
//! `read`/`write`; the [`frame`] module (`std` only) moves whole length-prefixed frames between
//! sockets and in-memory buffers.
//!
//! # Features
//!
//! * `std` (default): Enables the [`frame`] module and I/O error support.

#![no_std]

pub(crate) extern crate alloc;

#[cfg(feature = "std")]
pub(crate) extern crate std;

///
/// Packet sum types for protocol version 765, one module per connection state.
pub mod v765;

#[cfg(feature = "std")]
///
/// Reading and writing length-prefixed packet frames over blocking I/O.
pub mod frame;

use bytes::{Buf, BufMut};
use cobble_protocol::types::VarInt;
use cobble_protocol::ReadError;
use core::fmt::{Display, Formatter};

use crate::v765::ProtocolState;

///
/// A "packet", according to the
/// [Minecraft protocol](https://minecraft.wiki/w/Java_Edition_protocol). Implemented by both
/// clientbound and serverbound packet bodies; the direction is implied by which sum type the
/// packet appears in.
pub trait Packet {
    ///
    /// This packet's protocol identifier, unique within its state and direction.
    ///
    /// Since this identifier determines what the peer expects the data to look like, sending the
    /// wrong identifier will almost always result in a client disconnecting.
    fn protocol_id() -> VarInt;

    ///
    /// Reads the packet body from an in-memory buffer. The buffer is bounded by the enclosing
    /// frame, so types sized as "the rest of the packet" simply drain it.
    ///
    /// # Errors
    /// Yields an error if the packet data is not as expected; for example if the bytes were
    /// invalid for the type(s) this packet expects.
    fn read_body<B>(buf: &mut B) -> Result<Self>
    where
        Self: Sized,
        B: Buf + ?Sized;

    ///
    /// Writes this packet's body to an in-memory buffer, returning the number of bytes written.
    ///
    /// # Panics
    /// This method panics if the buffer doesn't have enough capacity to hold this packet's data.
    fn write_body<B>(&self, buf: &mut B) -> usize
    where
        B: BufMut + ?Sized;

    ///
    /// The number of bytes a call to [`Packet::write_body`] will enter into the buffer.
    ///
    /// Note that this is _not_ necessarily equal to the number of bytes that were consumed
    /// _reading_ an otherwise-equivalent packet: VarInts accept inefficient encodings that
    /// occupy more bytes than the value requires.
    fn len(&self) -> usize;
}

///
/// Type alias for [`cobble_protocol::Result`].
pub type Result<T> = cobble_protocol::Result<T>;

///
/// Errors produced when decoding or transporting packets.
#[derive(Debug)]
#[non_exhaustive]
pub enum PacketError {
    ///
    /// The packet body (or a length/id prefix) contained invalid data, or ran out of bytes.
    Read(ReadError),

    ///
    /// The packet id is not known for the connection state it arrived in.
    UnknownId {
        ///
        /// The state the connection was in.
        state: ProtocolState,

        ///
        /// The offending packet id.
        id: i32,
    },

    #[cfg(feature = "std")]
    ///
    /// The underlying transport failed. This includes EOF in the middle of a frame.
    Io(std::io::Error),
}

impl Display for PacketError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PacketError::Read(read) => Display::fmt(read, f),
            PacketError::UnknownId { state, id } => {
                write!(f, "unknown packet id {id:#04x} in state {state}")
            }

            #[cfg(feature = "std")]
            PacketError::Io(io) => write!(f, "I/O error: {io}"),
        }
    }
}

impl core::error::Error for PacketError {}

impl From<ReadError> for PacketError {
    fn from(value: ReadError) -> Self {
        PacketError::Read(value)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for PacketError {
    fn from(value: std::io::Error) -> Self {
        PacketError::Io(value)
    }
}

///
/// The smallest valid packet length: just a packet identifier, with an empty body.
pub const MIN_PACKET_LEN: i32 = 1_i32;

///
/// The largest frame length a peer may declare: id plus body, excluding the length prefix. The
/// protocol caps frames at `2^21 - 1` bytes (the widest value a three-byte length prefix can
/// carry); the frame reader rejects anything bigger before sizing a buffer for it.
///
/// Typed [`i32`] so it slots directly into [`cobble_protocol::types::validate_len`] alongside
/// the freshly decoded length, which is a [`VarInt`] and therefore signed.
pub const MAX_PACKET_LEN: i32 = 2_097_151_i32;
