use crate::util;
use crate::{validation_error, ProtocolRead, ProtocolWrite, Result};

use alloc::string::String;
use alloc::vec::Vec;
use bytes::{Buf, BufMut};
use core::fmt::{Display, Formatter};
use core::mem::size_of;
use core::ops::Deref;

///
/// The maximum number of bytes a [`VarInt`] may occupy on the wire.
pub const MAX_VAR_INT_BYTES: usize = 5;

///
/// The maximum number of bytes a [`VarLong`] may occupy on the wire.
pub const MAX_VAR_LONG_BYTES: usize = 10;

///
/// Validates that a length field read off the wire falls in `[min, max]`. Lengths outside the
/// range are a validation error, never a panic: they come from untrusted peers.
///
/// # Errors
/// Returns `Err` if `len` is less than `min` or greater than `max`.
#[inline]
pub const fn validate_len(len: i32, min: i32, max: i32) -> Result<()> {
    if len < min || len > max {
        return validation_error!(Read "length field out of range");
    }

    Ok(())
}

macro_rules! var_num_impl {
    ( $name:ident, $inner:ty, $decoder:ident, $encode_fn:path, $len_fn:path ) => {
        ///
        /// A variable-length number, encoded LEB128-style: 7 payload bits per byte, with the high
        /// bit set on every byte except the last. The two's-complement bit pattern is what gets
        /// encoded, so negative values always occupy the maximum number of bytes.
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name($inner);

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Deref for $name {
            type Target = $inner;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
                Display::fmt(&self.0, f)
            }
        }

        impl ProtocolRead for $name {
            type Output = Self;

            fn read_from<B: Buf + ?Sized>(read: &mut B) -> Result<Self> {
                let mut decoder = util::$decoder::new();

                loop {
                    if let Some(value) = decoder.feed(read.try_get_u8()?)? {
                        return Ok(Self(value));
                    }
                }
            }
        }

        impl ProtocolWrite for $name {
            fn write_to<B: BufMut + ?Sized>(&self, write: &mut B) -> usize {
                let (bytes, used) = $encode_fn(self.0);
                write.put_slice(&bytes[..used]);
                used
            }

            fn len(&self) -> usize {
                $len_fn(self.0)
            }
        }
    };
}

var_num_impl!(
    VarInt,
    i32,
    VarIntDecoder,
    util::var_int_encode,
    util::var_int_len
);

var_num_impl!(
    VarLong,
    i64,
    VarLongDecoder,
    util::var_long_encode,
    util::var_long_len
);

///
/// A [`VarInt`]-length-prefixed sequence of raw bytes.
///
/// No UTF-8 validation is performed in either direction; consumers that require valid UTF-8
/// should use [`VarString`] or validate themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VarBytes(pub Vec<u8>);

impl ProtocolRead for VarBytes {
    type Output = Self;

    fn read_from<B: Buf + ?Sized>(read: &mut B) -> Result<Self> {
        let len = *VarInt::read_from(read)?;
        let len = usize::try_from(len)
            .map_err(|_| validation_error!(*Read "negative byte sequence length"))?;

        if read.remaining() < len {
            return validation_error!(Read "byte sequence length exceeds available data");
        }

        let mut storage = alloc::vec![0; len];
        read.copy_to_slice(&mut storage);
        Ok(Self(storage))
    }
}

impl ProtocolWrite for VarBytes {
    fn write_to<B: BufMut + ?Sized>(&self, write: &mut B) -> usize {
        let prefix = VarInt::from(self.0.len() as i32).write_to(write);
        write.put_slice(&self.0);
        prefix + self.0.len()
    }

    fn len(&self) -> usize {
        util::prefixed_len(self.0.len())
    }
}

///
/// A [`VarInt`]-length-prefixed UTF-8 string. Identical wire shape to [`VarBytes`], but the
/// contents are validated as UTF-8 when reading.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VarString(pub String);

impl From<String> for VarString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for VarString {
    fn from(value: &str) -> Self {
        Self(String::from(value))
    }
}

impl ProtocolRead for VarString {
    type Output = Self;

    fn read_from<B: Buf + ?Sized>(read: &mut B) -> Result<Self> {
        let VarBytes(bytes) = VarBytes::read_from(read)?;

        String::from_utf8(bytes)
            .map(Self)
            .map_err(|_| validation_error!(*Read "string contained invalid UTF-8"))
    }
}

impl ProtocolWrite for VarString {
    fn write_to<B: BufMut + ?Sized>(&self, write: &mut B) -> usize {
        let bytes = self.0.as_bytes();
        let prefix = VarInt::from(bytes.len() as i32).write_to(write);
        write.put_slice(bytes);
        prefix + bytes.len()
    }

    fn len(&self) -> usize {
        util::prefixed_len(self.0.len())
    }
}

///
/// The rest of the bytes in the current packet, with no length prefix of its own. The packet
/// frame bounds how much data this reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemainingBytes(pub Vec<u8>);

impl ProtocolRead for RemainingBytes {
    type Output = Self;

    fn read_from<B: Buf + ?Sized>(read: &mut B) -> Result<Self> {
        let mut storage = alloc::vec![0; read.remaining()];
        read.copy_to_slice(&mut storage);
        Ok(Self(storage))
    }
}

impl ProtocolWrite for RemainingBytes {
    fn write_to<B: BufMut + ?Sized>(&self, write: &mut B) -> usize {
        write.put_slice(&self.0);
        self.0.len()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

impl ProtocolRead for bool {
    type Output = Self;

    fn read_from<B: Buf + ?Sized>(read: &mut B) -> Result<Self> {
        match read.try_get_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => validation_error!(Read "invalid boolean byte"),
        }
    }
}

impl ProtocolWrite for bool {
    fn write_to<B: BufMut + ?Sized>(&self, write: &mut B) -> usize {
        write.put_u8(u8::from(*self));
        1
    }

    fn len(&self) -> usize {
        1
    }
}

macro_rules! fixed_width_impl {
    ( $( $ty:ty => $get:ident, $put:ident );* $(;)? ) => {
        $(
            impl ProtocolRead for $ty {
                type Output = Self;

                fn read_from<B: Buf + ?Sized>(read: &mut B) -> Result<Self> {
                    Ok(read.$get()?)
                }
            }

            impl ProtocolWrite for $ty {
                fn write_to<B: BufMut + ?Sized>(&self, write: &mut B) -> usize {
                    write.$put(*self);
                    size_of::<$ty>()
                }

                fn len(&self) -> usize {
                    size_of::<$ty>()
                }
            }
        )*
    };
}

// everything multi-byte on the wire is big-endian
fixed_width_impl! {
    u8 => try_get_u8, put_u8;
    i8 => try_get_i8, put_i8;
    u16 => try_get_u16, put_u16;
    i16 => try_get_i16, put_i16;
    i32 => try_get_i32, put_i32;
    i64 => try_get_i64, put_i64;
    f32 => try_get_f32, put_f32;
    f64 => try_get_f64, put_f64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn var_bytes_round_trip() {
        let cases: &[&[u8]] = &[b"", b"Hi", b"\xFF\xFE\x00binary", &[0u8; 300]];

        for case in cases {
            let value = VarBytes(case.to_vec());
            let mut bytes = Vec::new();
            let written = value.write_to(&mut bytes);

            assert_eq!(written, value.len());
            assert_eq!(written, bytes.len());

            let read = VarBytes::read_from(&mut &bytes[..]).expect("bytes should have been valid");
            assert_eq!(read, value);
        }
    }

    #[test]
    fn var_string_rejects_invalid_utf8() {
        let mut bytes = Vec::new();
        VarBytes(vec![0xFF, 0xFE]).write_to(&mut bytes);

        assert!(VarString::read_from(&mut &bytes[..]).is_err());
    }

    #[test]
    fn var_bytes_rejects_truncated_data() {
        // declared length 5, only 2 bytes present
        let bytes = [0x05u8, 0x61, 0x62];
        assert!(VarBytes::read_from(&mut &bytes[..]).is_err());
    }

    #[test]
    fn var_bytes_rejects_negative_length() {
        let mut bytes = Vec::new();
        VarInt::from(-1).write_to(&mut bytes);

        assert!(VarBytes::read_from(&mut &bytes[..]).is_err());
    }

    #[test]
    fn remaining_bytes_drains_buffer() {
        let bytes = [1u8, 2, 3, 4];
        let mut buf = &bytes[..];

        let read = RemainingBytes::read_from(&mut buf).expect("read should have succeeded");

        assert_eq!(read.0, bytes);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn bool_rejects_out_of_range() {
        let bytes = [2u8];
        assert!(bool::read_from(&mut &bytes[..]).is_err());
    }

    #[test]
    fn fixed_width_big_endian() {
        let mut bytes = Vec::new();
        0x1234_5678_i32.write_to(&mut bytes);

        assert_eq!(bytes, [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn validate_len_bounds() {
        assert!(validate_len(1, 1, 10).is_ok());
        assert!(validate_len(10, 1, 10).is_ok());
        assert!(validate_len(0, 1, 10).is_err());
        assert!(validate_len(11, 1, 10).is_err());
        assert!(validate_len(-1, 0, i32::MAX).is_err());
    }
}
