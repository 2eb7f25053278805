//!
//! Support for NBT (named binary tag) format as used by Minecraft. `no_std` compatible.
//!
//! Tags are fully owned: deserializing copies data out of the source buffer, and dropping a tree
//! frees it. Compounds preserve insertion order, which makes serialize-then-deserialize an
//! identity on the byte level.
//!
//! Two "variants" of the format exist. The file variant gives the root tag a name; the network
//! variant, used inside packets since 1.20.2, omits it. Both are supported via
//! [`read_named`]/[`read_network`] and [`write_named`]/[`write_network`].
//!
//! # Features
//! * `std` (default): Currently only enables [`NbtError`] -> `std::io::Error` conversion.

#![no_std]

pub(crate) extern crate alloc;

#[cfg(feature = "std")]
pub(crate) extern crate std;

use alloc::string::String;
use alloc::vec::Vec;
use bytes::{Buf, BufMut, TryGetError};
use core::fmt;
use core::fmt::{Display, Formatter};

///
/// Type identifier for `TAG_End`.
pub const TAG_END: u8 = 0;

///
/// Type identifier for `TAG_Byte`.
pub const TAG_BYTE: u8 = 1;

///
/// Type identifier for `TAG_Short`.
pub const TAG_SHORT: u8 = 2;

///
/// Type identifier for `TAG_Int`.
pub const TAG_INT: u8 = 3;

///
/// Type identifier for `TAG_Long`.
pub const TAG_LONG: u8 = 4;

///
/// Type identifier for `TAG_Float`.
pub const TAG_FLOAT: u8 = 5;

///
/// Type identifier for `TAG_Double`.
pub const TAG_DOUBLE: u8 = 6;

///
/// Type identifier for `TAG_Byte_Array`.
pub const TAG_BYTE_ARRAY: u8 = 7;

///
/// Type identifier for `TAG_String`.
pub const TAG_STRING: u8 = 8;

///
/// Type identifier for `TAG_List`.
pub const TAG_LIST: u8 = 9;

///
/// Type identifier for `TAG_Compound`.
pub const TAG_COMPOUND: u8 = 10;

///
/// Type identifier for `TAG_Int_Array`.
pub const TAG_INT_ARRAY: u8 = 11;

///
/// Type identifier for `TAG_Long_Array`.
pub const TAG_LONG_ARRAY: u8 = 12;

///
/// Nesting limit for NBT deserialization. Trees deeper than this are rejected rather than risking
/// stack exhaustion on hostile input.
pub const DEPTH_LIMIT: usize = 64;

///
/// A single NBT value.
///
/// Lists are homogeneous: the element type identifier is stored alongside the elements, and is
/// meaningful even when the list is empty. Compounds are insertion-ordered sequences of
/// `(name, value)` pairs, matching the order tags appear in the serialized form.
///
/// The [`Display`] implementation renders SNBT ("stringified NBT"): decimal numbers,
/// double-quoted strings (without escape handling), `[B;..]`/`[I;..]`/`[L;..]` array prefixes,
/// and JSON-like braces and brackets for compounds and lists.
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    ///
    /// `TAG_End`. Terminates compounds; never a meaningful value on its own.
    End,

    ///
    /// `TAG_Byte`, a signed 8-bit integer.
    Byte(i8),

    ///
    /// `TAG_Short`, a signed big-endian 16-bit integer.
    Short(i16),

    ///
    /// `TAG_Int`, a signed big-endian 32-bit integer.
    Int(i32),

    ///
    /// `TAG_Long`, a signed big-endian 64-bit integer.
    Long(i64),

    ///
    /// `TAG_Float`, a big-endian IEEE 754 single.
    Float(f32),

    ///
    /// `TAG_Double`, a big-endian IEEE 754 double.
    Double(f64),

    ///
    /// `TAG_Byte_Array`, length-prefixed by a signed 32-bit count.
    ByteArray(Vec<u8>),

    ///
    /// `TAG_String`, a UTF-8 string length-prefixed by an unsigned 16-bit byte count.
    String(String),

    ///
    /// `TAG_List`: element type identifier plus elements of exactly that type.
    List(u8, Vec<Tag>),

    ///
    /// `TAG_Compound`: insertion-ordered named members, terminated on the wire by `TAG_End`.
    Compound(Vec<(String, Tag)>),

    ///
    /// `TAG_Int_Array`, length-prefixed by a signed 32-bit count.
    IntArray(Vec<i32>),

    ///
    /// `TAG_Long_Array`, length-prefixed by a signed 32-bit count.
    LongArray(Vec<i64>),
}

impl Tag {
    ///
    /// The wire type identifier of this tag, in range `0..=12`.
    #[must_use]
    pub const fn id(&self) -> u8 {
        match self {
            Tag::End => TAG_END,
            Tag::Byte(_) => TAG_BYTE,
            Tag::Short(_) => TAG_SHORT,
            Tag::Int(_) => TAG_INT,
            Tag::Long(_) => TAG_LONG,
            Tag::Float(_) => TAG_FLOAT,
            Tag::Double(_) => TAG_DOUBLE,
            Tag::ByteArray(_) => TAG_BYTE_ARRAY,
            Tag::String(_) => TAG_STRING,
            Tag::List(_, _) => TAG_LIST,
            Tag::Compound(_) => TAG_COMPOUND,
            Tag::IntArray(_) => TAG_INT_ARRAY,
            Tag::LongArray(_) => TAG_LONG_ARRAY,
        }
    }

    ///
    /// Looks up a direct member of a compound by name. Returns `None` if `self` is not a compound
    /// or has no member with that name. First match wins, per insertion order.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        match self {
            Tag::Compound(members) => members
                .iter()
                .find_map(|(key, tag)| (key == name).then_some(tag)),
            _ => None,
        }
    }

    ///
    /// The serialized size of this tag's payload in bytes, excluding the type identifier and any
    /// name.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        match self {
            Tag::End => 0,
            Tag::Byte(_) => 1,
            Tag::Short(_) => 2,
            Tag::Int(_) | Tag::Float(_) => 4,
            Tag::Long(_) | Tag::Double(_) => 8,
            Tag::ByteArray(data) => 4 + data.len(),
            Tag::String(data) => 2 + data.len(),
            Tag::List(_, elems) => {
                5 + elems.iter().map(Tag::payload_len).sum::<usize>()
            }
            Tag::Compound(members) => {
                members
                    .iter()
                    .map(|(name, tag)| 3 + name.len() + tag.payload_len())
                    .sum::<usize>()
                    + 1
            }
            Tag::IntArray(data) => 4 + data.len() * 4,
            Tag::LongArray(data) => 4 + data.len() * 8,
        }
    }
}

///
/// Error associated with reading or writing an NBT tree.
#[derive(Clone, Eq, PartialEq, Debug)]
#[non_exhaustive]
pub enum NbtError {
    ///
    /// The reader encountered the end of the data when it was expecting more.
    UnexpectedEof,

    ///
    /// The reader found an invalid type identifier, outside `0..=12`.
    UnknownType(u8),

    ///
    /// A name or `TAG_String` payload was not valid UTF-8.
    InvalidUtf8,

    ///
    /// A list or array being written does not fit a signed 32-bit length field.
    InvalidLength(usize),

    ///
    /// A non-empty list declared `TAG_End` as its element type.
    NonEmptyEndList,

    ///
    /// A list contains an element whose type differs from the list's declared element type. Only
    /// produced when writing; such a list cannot be constructed by the reader.
    MixedList,

    ///
    /// Nesting exceeded [`DEPTH_LIMIT`].
    DepthLimitExceeded,
}

impl Display for NbtError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NbtError::UnexpectedEof => f.write_str("unexpected EOF"),
            NbtError::UnknownType(ty) => write!(f, "unknown type identifier {}", *ty),
            NbtError::InvalidUtf8 => f.write_str("invalid UTF-8 bytes"),
            NbtError::InvalidLength(len) => write!(f, "length {} not encodable", *len),
            NbtError::NonEmptyEndList => {
                f.write_str("list of element type TAG_End had a non-zero length")
            }
            NbtError::MixedList => f.write_str("list element type mismatch"),
            NbtError::DepthLimitExceeded => f.write_str("exceeded depth limit"),
        }
    }
}

impl core::error::Error for NbtError {}

#[cfg(feature = "std")]
impl From<NbtError> for std::io::Error {
    fn from(value: NbtError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value)
    }
}

impl From<TryGetError> for NbtError {
    fn from(_: TryGetError) -> Self {
        NbtError::UnexpectedEof
    }
}

///
/// Result alias for NBT operations.
pub type Result<T> = core::result::Result<T, NbtError>;

///
/// Reads "file variant" NBT: the root tag carries a name.
///
/// # Errors
/// Returns `Err` if `read` does not contain a valid tree.
pub fn read_named<B: Buf + ?Sized>(read: &mut B) -> Result<(String, Tag)> {
    let (name, tag) = read_root(read, true)?;
    Ok((name.unwrap_or_default(), tag))
}

///
/// Reads "network variant" NBT: the root tag has no name.
///
/// # Errors
/// Returns `Err` if `read` does not contain a valid tree.
pub fn read_network<B: Buf + ?Sized>(read: &mut B) -> Result<Tag> {
    read_root(read, false).map(|(_, tag)| tag)
}

fn read_root<B: Buf + ?Sized>(read: &mut B, named: bool) -> Result<(Option<String>, Tag)> {
    let ty = read_type(read)?;

    if ty == TAG_END {
        return Ok((None, Tag::End));
    }

    let name = if named {
        Some(read_string(read)?)
    } else {
        None
    };

    Ok((name, read_payload(ty, read, 0)?))
}

fn read_type<B: Buf + ?Sized>(read: &mut B) -> Result<u8> {
    let ty = read.try_get_u8()?;

    if ty > TAG_LONG_ARRAY {
        return Err(NbtError::UnknownType(ty));
    }

    Ok(ty)
}

fn read_string<B: Buf + ?Sized>(read: &mut B) -> Result<String> {
    let len = read.try_get_u16()? as usize;

    if read.remaining() < len {
        return Err(NbtError::UnexpectedEof);
    }

    let mut bytes = alloc::vec![0; len];
    read.copy_to_slice(&mut bytes);

    String::from_utf8(bytes).map_err(|_| NbtError::InvalidUtf8)
}

///
/// Reads an i32 length prefix. Negative lengths clamp to zero, matching how the vanilla reader
/// treats them.
fn read_len<B: Buf + ?Sized>(read: &mut B) -> Result<usize> {
    let len = read.try_get_i32()?;
    Ok(usize::try_from(len).unwrap_or(0))
}

fn read_payload<B: Buf + ?Sized>(ty: u8, read: &mut B, depth: usize) -> Result<Tag> {
    if depth > DEPTH_LIMIT {
        return Err(NbtError::DepthLimitExceeded);
    }

    Ok(match ty {
        TAG_END => Tag::End,
        TAG_BYTE => Tag::Byte(read.try_get_i8()?),
        TAG_SHORT => Tag::Short(read.try_get_i16()?),
        TAG_INT => Tag::Int(read.try_get_i32()?),
        TAG_LONG => Tag::Long(read.try_get_i64()?),
        TAG_FLOAT => Tag::Float(read.try_get_f32()?),
        TAG_DOUBLE => Tag::Double(read.try_get_f64()?),

        TAG_BYTE_ARRAY => {
            let len = read_len(read)?;

            if read.remaining() < len {
                return Err(NbtError::UnexpectedEof);
            }

            let mut data = alloc::vec![0; len];
            read.copy_to_slice(&mut data);
            Tag::ByteArray(data)
        }

        TAG_STRING => Tag::String(read_string(read)?),

        TAG_LIST => {
            let elem_ty = read_type(read)?;
            let len = read_len(read)?;

            if elem_ty == TAG_END && len > 0 {
                return Err(NbtError::NonEmptyEndList);
            }

            // don't trust the declared length for the reservation: a 4-byte prefix can claim
            // billions of elements while the buffer holds none
            let mut elems = Vec::with_capacity(len.min(read.remaining()));
            for _ in 0..len {
                elems.push(read_payload(elem_ty, read, depth + 1)?);
            }

            Tag::List(elem_ty, elems)
        }

        TAG_COMPOUND => {
            let mut members = Vec::new();

            loop {
                let member_ty = read_type(read)?;
                if member_ty == TAG_END {
                    break;
                }

                let name = read_string(read)?;
                members.push((name, read_payload(member_ty, read, depth + 1)?));
            }

            Tag::Compound(members)
        }

        TAG_INT_ARRAY => {
            let len = read_len(read)?;

            if read.remaining() < len * 4 {
                return Err(NbtError::UnexpectedEof);
            }

            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read.get_i32());
            }

            Tag::IntArray(data)
        }

        TAG_LONG_ARRAY => {
            let len = read_len(read)?;

            if read.remaining() < len * 8 {
                return Err(NbtError::UnexpectedEof);
            }

            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read.get_i64());
            }

            Tag::LongArray(data)
        }

        _ => return Err(NbtError::UnknownType(ty)),
    })
}

///
/// Writes "file variant" NBT: the root tag is emitted with `name`.
///
/// # Errors
/// Returns `Err` if the tree contains a list or array longer than [`i32::MAX`], a non-empty list
/// of element type `TAG_End`, or a list element whose type differs from the declared element
/// type.
pub fn write_named<B: BufMut + ?Sized>(name: &str, tag: &Tag, write: &mut B) -> Result<()> {
    write.put_u8(tag.id());
    write_string(name, write)?;
    write_payload(tag, write)
}

///
/// Writes "network variant" NBT: the root tag is emitted without a name.
///
/// # Errors
/// See [`write_named`].
pub fn write_network<B: BufMut + ?Sized>(tag: &Tag, write: &mut B) -> Result<()> {
    write.put_u8(tag.id());
    write_payload(tag, write)
}

fn write_string<B: BufMut + ?Sized>(value: &str, write: &mut B) -> Result<()> {
    let len = u16::try_from(value.len()).map_err(|_| NbtError::InvalidLength(value.len()))?;

    write.put_u16(len);
    write.put_slice(value.as_bytes());
    Ok(())
}

fn write_len<B: BufMut + ?Sized>(len: usize, write: &mut B) -> Result<()> {
    let len = i32::try_from(len).map_err(|_| NbtError::InvalidLength(len))?;
    write.put_i32(len);
    Ok(())
}

fn write_payload<B: BufMut + ?Sized>(tag: &Tag, write: &mut B) -> Result<()> {
    match tag {
        Tag::End => {}
        Tag::Byte(val) => write.put_i8(*val),
        Tag::Short(val) => write.put_i16(*val),
        Tag::Int(val) => write.put_i32(*val),
        Tag::Long(val) => write.put_i64(*val),
        Tag::Float(val) => write.put_f32(*val),
        Tag::Double(val) => write.put_f64(*val),

        Tag::ByteArray(data) => {
            write_len(data.len(), write)?;
            write.put_slice(data);
        }

        Tag::String(data) => write_string(data, write)?,

        Tag::List(elem_ty, elems) => {
            if *elem_ty == TAG_END && !elems.is_empty() {
                return Err(NbtError::NonEmptyEndList);
            }

            write.put_u8(*elem_ty);
            write_len(elems.len(), write)?;

            for elem in elems {
                if elem.id() != *elem_ty {
                    return Err(NbtError::MixedList);
                }

                write_payload(elem, write)?;
            }
        }

        Tag::Compound(members) => {
            for (name, member) in members {
                write.put_u8(member.id());
                write_string(name, write)?;
                write_payload(member, write)?;
            }

            write.put_u8(TAG_END);
        }

        Tag::IntArray(data) => {
            write_len(data.len(), write)?;
            for val in data {
                write.put_i32(*val);
            }
        }

        Tag::LongArray(data) => {
            write_len(data.len(), write)?;
            for val in data {
                write.put_i64(*val);
            }
        }
    }

    Ok(())
}

fn fmt_separated<T>(
    f: &mut Formatter<'_>,
    items: impl Iterator<Item = T>,
    mut each: impl FnMut(&mut Formatter<'_>, T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }

        each(f, item)?;
    }

    Ok(())
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Tag::End => Ok(()),
            Tag::Byte(val) => write!(f, "{val}"),
            Tag::Short(val) => write!(f, "{val}"),
            Tag::Int(val) => write!(f, "{val}"),
            Tag::Long(val) => write!(f, "{val}"),
            Tag::Float(val) => write!(f, "{val}"),
            Tag::Double(val) => write!(f, "{val}"),

            Tag::ByteArray(data) => {
                f.write_str("[B;")?;
                fmt_separated(f, data.iter(), |f, val| write!(f, "{val}"))?;
                f.write_str("]")
            }

            Tag::String(data) => write!(f, "\"{data}\""),

            Tag::List(_, elems) => {
                f.write_str("[")?;
                fmt_separated(f, elems.iter(), |f, elem| write!(f, "{elem}"))?;
                f.write_str("]")
            }

            Tag::Compound(members) => {
                f.write_str("{")?;
                fmt_separated(f, members.iter(), |f, (name, member)| {
                    write!(f, "{name}:{member}")
                })?;
                f.write_str("}")
            }

            Tag::IntArray(data) => {
                f.write_str("[I;")?;
                fmt_separated(f, data.iter(), |f, val| write!(f, "{val}"))?;
                f.write_str("]")
            }

            Tag::LongArray(data) => {
                f.write_str("[L;")?;
                fmt_separated(f, data.iter(), |f, val| write!(f, "{val}"))?;
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    // adapted from https://minecraft.wiki/w/Minecraft_Wiki:Projects/wiki.vg_merge/NBT#Specification
    #[test]
    fn hello_world() {
        let data = [
            0x0Au8, // type ID (TAG_Compound)
            0x08, 0x00, 0x04, // type ID of String, plus length of name
            0x6E, 0x61, 0x6D, 0x65, // Name ('name')
            0x00, 0x09, // length of tag 'name'
            0x42, 0x61, 0x6E, 0x61, 0x6E, 0x72, 0x61, 0x6D, 0x61, // payload 'Bananrama'
            0x00, // TAG_End
        ];

        let expected = Tag::Compound(vec![(
            "name".to_string(),
            Tag::String("Bananrama".to_string()),
        )]);

        let tag = read_network(&mut &data[..]).expect("tag should have been valid");
        assert_eq!(expected, tag);
        assert_eq!(
            tag.get("name"),
            Some(&Tag::String("Bananrama".to_string()))
        );
    }

    #[test]
    fn named_round_trip() {
        let tag = Tag::Compound(vec![
            ("byte".to_string(), Tag::Byte(-1)),
            ("short".to_string(), Tag::Short(32767)),
            ("int".to_string(), Tag::Int(-2_000_000)),
            ("long".to_string(), Tag::Long(9_007_199_254_740_993)),
            ("float".to_string(), Tag::Float(0.5)),
            ("double".to_string(), Tag::Double(0.493_128_713_218_231_5)),
            ("bytes".to_string(), Tag::ByteArray(vec![0, 62, 34, 16, 8])),
            (
                "list".to_string(),
                Tag::List(TAG_LONG, vec![Tag::Long(11), Tag::Long(12), Tag::Long(13)]),
            ),
            (
                "nested".to_string(),
                Tag::Compound(vec![(
                    "name".to_string(),
                    Tag::String("Eggbert".to_string()),
                )]),
            ),
            ("ints".to_string(), Tag::IntArray(vec![1, 2, 3])),
            ("longs".to_string(), Tag::LongArray(vec![-1, 0, 1])),
        ]);

        let mut bytes = Vec::new();
        write_named("Level", &tag, &mut bytes).expect("write should have succeeded");

        let (name, read) = read_named(&mut &bytes[..]).expect("tag should have been valid");

        assert_eq!(name, "Level");
        assert_eq!(read, tag);
    }

    #[test]
    fn network_variant_root_has_no_name() {
        let tag = Tag::Compound(vec![("x".to_string(), Tag::Int(7))]);

        let mut network = Vec::new();
        write_network(&tag, &mut network).expect("write should have succeeded");

        let mut named = Vec::new();
        write_named("", &tag, &mut named).expect("write should have succeeded");

        // the file variant carries two extra bytes for the (empty) root name
        assert_eq!(network.len() + 2, named.len());
        assert_eq!(read_network(&mut &network[..]).unwrap(), tag);
    }

    #[test]
    fn compound_preserves_insertion_order() {
        let tag = Tag::Compound(vec![
            ("z".to_string(), Tag::Byte(1)),
            ("a".to_string(), Tag::Byte(2)),
            ("m".to_string(), Tag::Byte(3)),
        ]);

        let mut bytes = Vec::new();
        write_network(&tag, &mut bytes).expect("write should have succeeded");

        let Tag::Compound(members) = read_network(&mut &bytes[..]).unwrap() else {
            panic!("expected a compound");
        };

        let names: Vec<&str> = members.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn non_empty_end_list_rejected() {
        // TAG_List of TAG_End, declared length 1
        let data = [0x09u8, 0x00, 0x09, 0x00, 0x00, 0x00, 0x01];
        assert_eq!(
            read_network(&mut &data[..]),
            Err(NbtError::NonEmptyEndList)
        );

        let bad = Tag::List(TAG_END, vec![Tag::End]);
        let mut out = Vec::new();
        assert_eq!(
            write_network(&bad, &mut out),
            Err(NbtError::NonEmptyEndList)
        );
    }

    #[test]
    fn empty_end_list_permitted() {
        let tag = Tag::List(TAG_END, vec![]);

        let mut bytes = Vec::new();
        write_network(&tag, &mut bytes).expect("write should have succeeded");
        assert_eq!(read_network(&mut &bytes[..]).unwrap(), tag);
    }

    #[test]
    fn negative_array_length_clamps_to_zero() {
        // TAG_Byte_Array with length -5, followed by nothing
        let data = [0x07u8, 0xFF, 0xFF, 0xFF, 0xFB];
        assert_eq!(
            read_network(&mut &data[..]),
            Ok(Tag::ByteArray(Vec::new()))
        );
    }

    #[test]
    fn mixed_list_rejected_on_write() {
        let bad = Tag::List(TAG_INT, vec![Tag::Int(1), Tag::Byte(2)]);

        let mut out = Vec::new();
        assert_eq!(write_network(&bad, &mut out), Err(NbtError::MixedList));
    }

    #[test]
    fn depth_limit_enforced() {
        let mut tag = Tag::Compound(vec![]);
        for _ in 0..(DEPTH_LIMIT + 2) {
            tag = Tag::Compound(vec![("n".to_string(), tag)]);
        }

        let mut bytes = Vec::new();
        write_network(&tag, &mut bytes).expect("write should have succeeded");

        assert_eq!(
            read_network(&mut &bytes[..]),
            Err(NbtError::DepthLimitExceeded)
        );
    }

    #[test]
    fn unknown_type_rejected() {
        let data = [0x0Du8];
        assert_eq!(read_network(&mut &data[..]), Err(NbtError::UnknownType(13)));
    }

    #[test]
    fn truncated_input_rejected() {
        // TAG_Int with only two payload bytes
        let data = [0x03u8, 0x00, 0x01];
        assert_eq!(read_network(&mut &data[..]), Err(NbtError::UnexpectedEof));
    }

    #[test]
    fn snbt_rendering() {
        let tag = Tag::Compound(vec![
            ("name".to_string(), Tag::String("Bananrama".to_string())),
            ("count".to_string(), Tag::Int(-3)),
            ("bytes".to_string(), Tag::ByteArray(vec![0, 62, 34])),
            (
                "list".to_string(),
                Tag::List(TAG_INT, vec![Tag::Int(1), Tag::Int(2)]),
            ),
            ("longs".to_string(), Tag::LongArray(vec![11, 12])),
        ]);

        assert_eq!(
            tag.to_string(),
            "{name:\"Bananrama\",count:-3,bytes:[B;0,62,34],list:[1,2],longs:[L;11,12]}"
        );
    }

    #[test]
    fn payload_len_matches_serialized_size() {
        let tag = Tag::Compound(vec![
            ("a".to_string(), Tag::Int(1)),
            (
                "b".to_string(),
                Tag::List(TAG_STRING, vec![Tag::String("xy".to_string())]),
            ),
            ("c".to_string(), Tag::LongArray(vec![1, 2])),
        ]);

        let mut bytes = Vec::new();
        write_network(&tag, &mut bytes).expect("write should have succeeded");

        // one byte for the root type identifier
        assert_eq!(bytes.len(), tag.payload_len() + 1);
    }
}
