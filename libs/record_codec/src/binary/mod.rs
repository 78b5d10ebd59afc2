//! Compact binary backend.
//!
//! See the [crate root](crate) for the layout. Writing requires a seekable
//! sink: every object header is reserved up front and patched once the
//! object's fields are known. A sink that cannot seek, such as a socket, is
//! not usable as a target; encode into a [`Vec<u8>`] with [`to_vec`] and send
//! that instead.

use std::io;

use crate::error::Result;
use crate::record::Record;

mod de;
mod frame;
mod read;
mod ser;

pub use de::BinaryReader;
pub use frame::MAX_FIELDS;
pub use read::{ByteRead, IoRead};
pub use ser::BinaryWriter;

/// Marker following the fields of every object.
const END_OBJECT: u8 = 0;

/// Marker following the elements of every array.
const END_ARRAY: u8 = 0;

/// Serializes a record at the latest version into a [`Vec<u8>`].
///
/// # Errors
///
/// Returns an error if the record's declaration is invalid. No bytes are
/// returned in that case.
pub fn to_vec<T>(record: &mut T, latest: u32) -> Result<Vec<u8>>
where
    T: Record + ?Sized,
{
    to_vec_versioned(record, latest, latest)
}

/// Serializes a record at a specific target version into a [`Vec<u8>`].
///
/// # Errors
///
/// Returns an error if `version` is newer than `latest` or the record's
/// declaration is invalid.
pub fn to_vec_versioned<T>(record: &mut T, latest: u32, version: u32) -> Result<Vec<u8>>
where
    T: Record + ?Sized,
{
    let writer = to_writer(io::Cursor::new(Vec::new()), record, latest, version)?;
    Ok(writer.into_inner())
}

/// Serializes a record to a seekable [`io::Write`], returning the flushed
/// writer.
///
/// If this fails, the writer is dropped and may hold a partial stream.
///
/// # Errors
///
/// Returns an error if `version` is newer than `latest`, the record's
/// declaration is invalid, or writing fails.
pub fn to_writer<W, T>(writer: W, record: &mut T, latest: u32, version: u32) -> Result<W>
where
    W: io::Write + io::Seek,
    T: Record + ?Sized,
{
    let mut session = BinaryWriter::with_version(writer, latest, version)?;
    session.write_root(record)?;
    session.finish()
}

/// Deserializes a record from a byte slice.
///
/// The slice must hold exactly one stream.
///
/// # Errors
///
/// Returns an error if the stream is malformed, truncated, followed by
/// trailing bytes, or newer than `latest`.
pub fn from_slice<T>(buf: &[u8], latest: u32) -> Result<T>
where
    T: Record + Default,
{
    let mut session = BinaryReader::new(buf, latest)?;
    let mut record = T::default();
    session.read_root(&mut record)?;
    if !session.remainder().is_empty() {
        return Err(crate::Error::TrailingBytes);
    }

    Ok(record)
}

/// Deserializes a record from a [`io::Read`].
///
/// The reader may still have bytes available when this function returns
/// successfully.
///
/// # Errors
///
/// Returns an error if the stream is malformed, truncated, or newer than
/// `latest`.
pub fn from_reader<T, R>(reader: R, latest: u32) -> Result<T>
where
    T: Record + Default,
    R: io::Read,
{
    let mut session = BinaryReader::new(IoRead::new(reader), latest)?;
    let mut record = T::default();
    session.read_root(&mut record)?;
    Ok(record)
}
