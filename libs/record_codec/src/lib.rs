//! # Versioned record codec
//!
//! Records describe their fields once, in a fixed order, to a [`Session`].
//! The same [`Record::serialize`] routine runs for reading and for writing
//! and for either backend:
//!
//! - [`binary`]: compact, not self-describing. Every record is an object
//!   frame whose bitmask marks the fields that differ from their default;
//!   defaulted fields take no space at all.
//! - [`text`]: JSON with named properties, mirroring the same record tree.
//!
//! Every field carries a [`Versions`] range. A field whose range does not
//! contain the stream's version is skipped entirely by both backends and, when
//! reading, takes its declared default. This lets a record family add and
//! retire fields over time while still loading older streams.
//!
//! The binary layout is as follows:
//!
//! - stream: `u32` version, then the root object frame
//! - object frame: `u32` bitmask, optional `u8` type tag, the flagged fields in
//!   declared order, then a `u8` end marker (`0`)
//! - array: `u16` element count, one object frame per element, then a `u8` end
//!   marker (`0`)
//! - scalars: `i32` and `f32` as 4 little-endian bytes, [`Vec3`] as three
//!   consecutive `f32`
//!
//! An object frame holds at most 31 fields. Bit 31 of the bitmask is reserved:
//! the header is written as `0xFFFF_FFFF` and only patched once the frame is
//! complete, so an unfinished stream cannot be mistaken for a valid one.
//!
//! Polymorphic members are closed enums implementing [`Member`] with
//! [`Member::TAGGED`] set; a type tag is stored ahead of each instance.

// for integration tests
#[cfg(test)]
use tempfile as _;

pub mod binary;
pub mod error;
mod record;
mod session;
pub mod text;
pub mod varint;
mod vec3;
mod version;

pub use error::{Error, ErrorKind, Result};
pub use record::{Member, Record, Scalar};
pub use session::Session;
pub use vec3::Vec3;
pub use version::{Versions, gate};
