//!
//! Support collections for `cobble` that are too general-purpose to go in any other crate.

#![no_std]

pub(crate) extern crate alloc;

#[cfg(feature = "std")]
pub(crate) extern crate std;

///
/// A growable double-ended queue backed by a ring buffer.
pub mod ring;

///
/// A fixed-stride integer array packed into 64-bit words.
pub mod bits;

pub use bits::PackedBits;
pub use ring::RingBuffer;
