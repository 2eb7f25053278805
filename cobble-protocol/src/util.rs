use crate::types::{MAX_VAR_INT_BYTES, MAX_VAR_LONG_BYTES};

///
/// The low seven bits of every encoded byte carry payload.
const PAYLOAD_MASK: u8 = 0x7F;

///
/// The high bit of an encoded byte marks "more bytes follow".
const CONTINUATION_BIT: u8 = 0x80;

///
/// Returns the number of bytes required to encode the given value as a
/// [`crate::types::VarInt`]. The returned value will _always_ be in range
/// `[1, MAX_VAR_INT_BYTES]`, for all possible [`i32`].
#[inline]
#[allow(
    clippy::cast_sign_loss,
    reason = "Cast needed to get the raw bits of the value"
)]
#[must_use]
pub const fn var_int_len(val: i32) -> usize {
    // `| 1` avoids a branch for zero without changing the result
    let bits = 32 - ((val as u32) | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

///
/// Returns the number of bytes required to encode the given value as a
/// [`crate::types::VarLong`]. The returned value will _always_ be in range
/// `[1, MAX_VAR_LONG_BYTES]`, for all possible [`i64`].
#[inline]
#[allow(
    clippy::cast_sign_loss,
    reason = "Cast needed to get the raw bits of the value"
)]
#[must_use]
pub const fn var_long_len(val: i64) -> usize {
    let bits = 64 - ((val as u64) | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

///
/// Computes the length of some number of bytes, when prefixed by a [`crate::types::VarInt`]. To do
/// this, `length` must first be converted to `i32`: it will saturate at [`i32::MAX`]. The returned
/// value will saturate at [`usize::MAX`].
#[must_use]
pub fn prefixed_len(length: usize) -> usize {
    var_int_len(i32::try_from(length).unwrap_or(i32::MAX)).saturating_add(length)
}

///
/// Shorthand for creating a validation error with a static message.
///
/// # Example
/// ```
/// use std::num::NonZeroUsize;
/// use cobble_protocol::validation_error;
///
/// // use `*Read` if you want a `cobble_protocol::ReadError` instead of a Result
/// let res = NonZeroUsize::new(0).ok_or_else(|| validation_error!(*Read "Expected non-zero value"));
///
/// assert!(res.is_err());
///
/// // result with an error type of `cobble_protocol::ReadError`
/// let err: cobble_protocol::Result<()> = validation_error!(Read "Read validation error occurred");
///
/// assert!(err.is_err())
/// ```
#[macro_export]
macro_rules! validation_error {
    ( Read $lit:expr ) => {
        core::result::Result::Err($crate::ReadError::new($crate::ErrorReason::Validation(
            core::option::Option::Some($crate::Message::Static($lit)),
        )))
    };

    ( *Read $lit:expr ) => {
        $crate::ReadError::new($crate::ErrorReason::Validation(core::option::Option::Some(
            $crate::Message::Static($lit),
        )))
    };
}

macro_rules! var_num_codec {
    ( $decoder:ident, $encode_name:ident, $val:ty, $uval:ty, $bits:literal, $max:expr ) => {
        ///
        /// Incremental decoder for one variable-length number, fed a byte at a time.
        ///
        /// Useful when bytes trickle in from a blocking stream and the encoded width isn't
        /// known up front, as with packet length prefixes. The accumulator works in the
        /// unsigned domain; the final bit pattern is reinterpreted as signed.
        #[derive(Clone, Debug, Default)]
        pub struct $decoder {
            acc: $uval,
            shift: u32,
        }

        impl $decoder {
            ///
            /// A decoder with nothing fed yet.
            #[must_use]
            pub const fn new() -> Self {
                Self { acc: 0, shift: 0 }
            }

            ///
            /// Consumes one encoded byte. Yields the decoded value when `byte` completed the
            /// number, or `None` while more bytes are expected.
            ///
            /// # Errors
            /// Returns `Err` once the encoding runs wider than the target type. The decoder
            /// holds no useful state after that and should be discarded.
            #[allow(
                clippy::cast_possible_wrap,
                reason = "Reinterpreting the accumulated bit pattern as signed is the decode"
            )]
            pub fn feed(&mut self, byte: u8) -> $crate::Result<Option<$val>> {
                if self.shift >= $bits {
                    return $crate::validation_error!(
                        Read concat!("variable-length number wider than ", $bits, " bits")
                    );
                }

                self.acc |= <$uval>::from(byte & PAYLOAD_MASK) << self.shift;

                if byte & CONTINUATION_BIT != 0 {
                    self.shift += 7;
                    return Ok(None);
                }

                Ok(Some(self.acc as $val))
            }
        }

        ///
        /// Encodes `value` into a stack buffer, returning the buffer together with how many of
        /// its leading bytes were used. The used prefix is always the canonical (shortest)
        /// encoding.
        #[allow(
            clippy::cast_sign_loss,
            reason = "The encoding covers the bit pattern, not the numeric value"
        )]
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Truncation to the low byte is intended"
        )]
        #[must_use]
        pub fn $encode_name(value: $val) -> ([u8; $max], usize) {
            let mut out = [0u8; $max];
            let mut rest = value as $uval;
            let mut used = 0;

            loop {
                let done = rest < 0x80;
                out[used] = (rest as u8 & PAYLOAD_MASK) | if done { 0 } else { CONTINUATION_BIT };
                used += 1;

                if done {
                    return (out, used);
                }

                rest >>= 7;
            }
        }
    };
}

var_num_codec!(VarIntDecoder, var_int_encode, i32, u32, 32, MAX_VAR_INT_BYTES);
var_num_codec!(VarLongDecoder, var_long_encode, i64, u64, 64, MAX_VAR_LONG_BYTES);

#[cfg(test)]
mod tests {
    use crate::types::{VarInt, VarLong, MAX_VAR_INT_BYTES, MAX_VAR_LONG_BYTES};
    use crate::util::{var_int_encode, var_int_len, var_long_len, VarIntDecoder};
    use crate::{ProtocolRead, ProtocolWrite};
    use alloc::vec::Vec;

    fn round_trip_int(val: i32) -> Vec<u8> {
        let mut bytes = Vec::new();
        let written = VarInt::from(val).write_to(&mut bytes);

        assert_eq!(written, bytes.len());
        assert_eq!(written, var_int_len(val));

        let read = VarInt::read_from(&mut &bytes[..]).expect("VarInt should have been valid");
        assert_eq!(*read, val);

        bytes
    }

    fn round_trip_long(val: i64) -> Vec<u8> {
        let mut bytes = Vec::new();
        let written = VarLong::from(val).write_to(&mut bytes);

        assert_eq!(written, bytes.len());
        assert_eq!(written, var_long_len(val));

        let read = VarLong::read_from(&mut &bytes[..]).expect("VarLong should have been valid");
        assert_eq!(*read, val);

        bytes
    }

    #[test]
    fn known_var_int_encodings() {
        let cases: &[(i32, &[u8])] = &[
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7F]),
            (128, &[0x80, 0x01]),
            (255, &[0xFF, 0x01]),
            (25565, &[0xDD, 0xC7, 0x01]),
            (2_097_151, &[0xFF, 0xFF, 0x7F]),
            (i32::MAX, &[0xFF, 0xFF, 0xFF, 0xFF, 0x07]),
            (-1, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
            (i32::MIN, &[0x80, 0x80, 0x80, 0x80, 0x08]),
        ];

        for (val, expected) in cases {
            assert_eq!(&round_trip_int(*val)[..], *expected, "for {val}");
        }
    }

    #[test]
    fn known_var_long_encodings() {
        let cases: &[(i64, &[u8])] = &[
            (
                i64::MAX,
                &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F],
            ),
            (
                i64::MIN,
                &[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01],
            ),
        ];

        for (val, expected) in cases {
            assert_eq!(&round_trip_long(*val)[..], *expected, "for {val}");
        }
    }

    #[test]
    fn incremental_decode() {
        let (bytes, used) = var_int_encode(25565);
        assert_eq!(&bytes[..used], [0xDD, 0xC7, 0x01]);

        let mut decoder = VarIntDecoder::new();
        assert_eq!(decoder.feed(0xDD).unwrap(), None);
        assert_eq!(decoder.feed(0xC7).unwrap(), None);
        assert_eq!(decoder.feed(0x01).unwrap(), Some(25565));
    }

    #[test]
    fn overlong_var_int() {
        // six continuation bytes: always out of range for 32 bits
        let bytes = [0x80u8, 0x80, 0x80, 0x80, 0x80, 0x00];
        assert!(VarInt::read_from(&mut &bytes[..]).is_err());
    }

    #[test]
    fn overlong_var_long() {
        // eleven continuation bytes: always out of range for 64 bits
        let bytes = [
            0x80u8, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00,
        ];
        assert!(VarLong::read_from(&mut &bytes[..]).is_err());
    }

    #[test]
    fn len_bounds() {
        for i in [i32::MIN, -1, 0, 1, 127, 128, 25565, i32::MAX] {
            assert!((1..=MAX_VAR_INT_BYTES).contains(&var_int_len(i)));
        }

        for i in [i64::MIN, -1, 0, 1, i64::MAX] {
            assert!((1..=MAX_VAR_LONG_BYTES).contains(&var_long_len(i)));
        }
    }

    #[test]
    fn len_boundaries() {
        assert_eq!(var_int_len(0), 1);
        assert_eq!(var_int_len(1), 1);
        assert_eq!(var_int_len(127), 1);
        assert_eq!(var_int_len(128), 2);
        assert_eq!(var_int_len(-1), 5);
        assert_eq!(var_long_len(-1), 10);
    }

    #[test]
    fn inefficient_encoding_reads_back() {
        // 42 encoded using more bytes than strictly necessary is still valid
        let bytes = [0xAAu8, 0x80, 0x80, 0x80, 0x00];
        let read = VarInt::read_from(&mut &bytes[..]).expect("VarInt should have been valid");

        assert_eq!(*read, 42);
        assert_eq!(read.len(), 1);
    }
}
