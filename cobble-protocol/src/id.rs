use crate::{ProtocolRead, ProtocolWrite, Result};

use bytes::{Buf, BufMut};
use md5::{Digest, Md5};
use uuid::Uuid;

///
/// The number of bytes a UUID occupies on the wire.
pub const UUID_BYTES: usize = 16;

impl ProtocolRead for Uuid {
    type Output = Self;

    ///
    /// Reads a UUID as a single 16-byte big-endian blob.
    fn read_from<B: Buf + ?Sized>(read: &mut B) -> Result<Self> {
        Ok(Uuid::from_u128(read.try_get_u128()?))
    }
}

impl ProtocolWrite for Uuid {
    fn write_to<B: BufMut + ?Sized>(&self, write: &mut B) -> usize {
        write.put_u128(self.as_u128());
        UUID_BYTES
    }

    fn len(&self) -> usize {
        UUID_BYTES
    }
}

///
/// Derives a version-3 UUID from the given bytes: the input is MD5-hashed and the version nibble
/// of the digest is rewritten to `0x3`.
///
/// Used to assign stable identities to offline-mode players, where the input is the UTF-8 player
/// name. The derivation is a pure function of `input`.
#[must_use]
pub fn offline_uuid(input: &[u8]) -> Uuid {
    let digest = Md5::digest(input);

    let mut bytes: [u8; UUID_BYTES] = digest.into();
    bytes[6] = (bytes[6] & 0x0F) | 0x30;

    Uuid::from_bytes(bytes)
}
