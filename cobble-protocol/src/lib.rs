//!
//! Primitive types for the Minecraft Java Edition protocol. Can be used in a `no_std` environment,
//! but can't be used without `alloc`.
//!
//! This crate does not include packet definitions (see `cobble-packet` for that), but _does_
//! include the types that packets are assembled from, including but not limited to:
//!
//! * [`types::VarInt`]
//! * [`types::VarLong`]
//! * [`types::VarString`]
//! * [`types::VarBytes`]
//!
//! These types are fairly "stable" across protocol versions, unlike the packet definitions that
//! sit on top of them.
//!
//! # Features
//!
//! * `std` (default): Enables `std` support. Currently, this allows conversion from [`ReadError`]
//!   to `std::io::Error`, and support for the `Io` variant of the [`ErrorReason`] enum.
//! * `uuid` (default): Enables the [`id`] module, with wire support for [`uuid::Uuid`] and the
//!   offline-mode version-3 derivation.

#![no_std]

pub(crate) extern crate alloc;

#[cfg(feature = "std")]
pub(crate) extern crate std;

#[cfg(target_pointer_width = "16")]
///
/// We may need to index slices larger than 65535 for full support of the MC protocol.
compile_error!("This crate does not support 16-bit targets");

///
/// Basic protocol type definitions.
pub mod types;

///
/// Useful utilities, mostly concerned with LEB128-style encoding.
pub mod util;

#[cfg(feature = "uuid")]
///
/// [`ProtocolRead`] and [`ProtocolWrite`] support for [`uuid::Uuid`], plus offline-mode
/// identifier derivation.
pub mod id;

use alloc::string::String;
use bytes::{Buf, BufMut, TryGetError};
use core::fmt::{Debug, Display, Formatter};

///
/// A type that can be read from a [`Buf`]. For the equivalent used when writing, see
/// [`ProtocolWrite`]. Most types that implement this trait will also want to implement
/// `ProtocolWrite`.
pub trait ProtocolRead {
    ///
    /// The output type. Commonly this is just `Self`, though it may differ for wrapper types.
    type Output;

    ///
    /// Reads the output type from an in-memory buffer. Advances the buffer by the number of bytes
    /// read.
    ///
    /// # Errors
    /// This function returns `Err` if the data encountered in the buffer is invalid for the output
    /// type, or if there are not enough bytes to read everything.
    fn read_from<B: Buf + ?Sized>(read: &mut B) -> Result<Self::Output>;
}

///
/// A type that can be written to a [`BufMut`]. See [`ProtocolRead`] for the equivalent type used
/// when reading.
pub trait ProtocolWrite {
    ///
    /// Writes this type to an in-memory buffer, and returns the number of bytes that were written.
    ///
    /// # Panics
    /// This method panics if the size of the type exceeds the buffer's remaining capacity. The
    /// size of any [`ProtocolWrite`] can be obtained via [`ProtocolWrite::len`].
    fn write_to<B: BufMut + ?Sized>(&self, write: &mut B) -> usize;

    ///
    /// Gets the length of this type, in bytes. This is the number of bytes that will be entered
    /// into the buffer by [`ProtocolWrite::write_to`].
    ///
    /// Can be used to pre-size buffers so that writes cannot panic. Reporting the wrong length is
    /// a logic error.
    fn len(&self) -> usize;
}

///
/// Type alias used for the result of reading a protocol type from a buffer.
pub type Result<T> = core::result::Result<T, ReadError>;

///
/// Common error type indicating an issue was encountered when attempting to read something from a
/// buffer, often (though not necessarily) in the context of network I/O. This includes validation
/// failures (bad data) as well as generic I/O problems.
#[derive(Debug)]
pub struct ReadError {
    reason: ErrorReason,
}

impl ReadError {
    ///
    /// Creates a new [`ReadError`] from the specified [`ErrorReason`].
    ///
    /// For a more ergonomic alternative in the common case of needing a static error message, see
    /// the [`validation_error`] macro.
    pub const fn new(reason: ErrorReason) -> Self {
        Self { reason }
    }

    ///
    /// The reason this error occurred.
    #[must_use]
    pub const fn reason(&self) -> &ErrorReason {
        &self.reason
    }
}

///
/// Reason for a read error. See [`ReadError`].
///
/// This enum is non-exhaustive, to ensure that variants can be added in minor releases. The
/// [`ErrorReason::Io`] variant only exists when the `std` feature is enabled.
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorReason {
    ///
    /// Validation failure. Optionally supplies a [`Message`] explaining the reason for the
    /// failure.
    ///
    /// Validation failure typically indicates that some parameter was intact, but its value is
    /// invalid for the given context, or in general.
    Validation(Option<Message>),

    ///
    /// Not enough bytes to read the full type.
    NotEnoughBytes,

    #[cfg(feature = "std")]
    ///
    /// Read error was caused by some sort of I/O failure. Only available if the `std` feature is
    /// enabled.
    Io(std::io::Error),
}

///
/// An error message. Can either be [`Message::Static`] (representing a fixed message) or
/// [`Message::Owned`] (representing a dynamic message constructed at runtime).
#[derive(Clone, Debug)]
pub enum Message {
    ///
    /// A static message, generally just a string literal. Useful for avoiding allocating a
    /// string, if the message won't change.
    Static(&'static str),

    ///
    /// An owned message. Prefer using [`Message::Static`] unless the error message has to be
    /// constructed dynamically.
    Owned(String),
}

impl AsRef<str> for Message {
    fn as_ref(&self) -> &str {
        match self {
            Message::Static(string) => string,
            Message::Owned(string) => string.as_str(),
        }
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Owned(s)
    }
}

impl From<&'static str> for Message {
    fn from(s: &'static str) -> Self {
        Message::Static(s)
    }
}

impl Display for ReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "read {}", self.reason)
    }
}

impl core::error::Error for ReadError {}

impl Display for ErrorReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrorReason::Validation(message) => match message {
                None => write!(f, "validation error"),
                Some(message) => write!(f, "validation error: {message}"),
            },
            ErrorReason::NotEnoughBytes => write!(f, "not enough bytes"),

            #[cfg(feature = "std")]
            ErrorReason::Io(io) => write!(f, "I/O error: {io}"),
        }
    }
}

#[cfg(feature = "std")]
impl From<ReadError> for std::io::Error {
    fn from(value: ReadError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for ReadError {
    fn from(value: std::io::Error) -> Self {
        ReadError::new(ErrorReason::Io(value))
    }
}

impl From<TryGetError> for ReadError {
    fn from(_: TryGetError) -> Self {
        ReadError::new(ErrorReason::NotEnoughBytes)
    }
}
