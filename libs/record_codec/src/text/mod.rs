//! Structured text backend.
//!
//! Records are written as JSON. The root object starts with an integer
//! `version` property, followed by the root record's fields. Nested records are
//! objects, polymorphic ones with a leading integer `type` property. Arrays of
//! records are JSON arrays without a count. Vectors are arrays of three
//! floats. A nested record that is absent is written as `null`.
//!
//! Fields outside their version range are omitted entirely. Property names are
//! written for readability, but reading is positional: a name that differs
//! from the expected one is only logged, while a token of the wrong kind
//! fails the load.

use serde_json::Value;

use crate::error::Result;
use crate::record::Record;

mod de;
mod ser;
mod token;

pub use de::{TextReader, TokenReader};
pub use ser::{TextWriter, TokenWriter};
pub use token::Token;

/// Name of the root object's leading version property.
const VERSION_PROPERTY: &str = "version";

/// Name of the type tag property of polymorphic members.
const TYPE_PROPERTY: &str = "type";

/// How a document is printed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// No insignificant whitespace.
    Compact,
    /// Indented, one property per line.
    #[default]
    Pretty,
}

/// Serializes a record at the latest version into a [`String`].
///
/// # Errors
///
/// Returns an error if the record's declaration is invalid or it holds a
/// non-finite float.
pub fn to_string<T>(record: &mut T, latest: u32, style: TextStyle) -> Result<String>
where
    T: Record + ?Sized,
{
    to_string_versioned(record, latest, latest, style)
}

/// Serializes a record at a specific target version into a [`String`].
///
/// # Errors
///
/// Returns an error if `version` is newer than `latest`, the record's
/// declaration is invalid, or it holds a non-finite float.
pub fn to_string_versioned<T>(
    record: &mut T,
    latest: u32,
    version: u32,
    style: TextStyle,
) -> Result<String>
where
    T: Record + ?Sized,
{
    let mut session = TextWriter::with_version(latest, version)?;
    session.write_root(record)?;
    session.finish_string(style)
}

/// Serializes a record at the latest version into a JSON [`Value`].
///
/// # Errors
///
/// Same as [`to_string`].
pub fn to_value<T>(record: &mut T, latest: u32) -> Result<Value>
where
    T: Record + ?Sized,
{
    let mut session = TextWriter::new(latest);
    session.write_root(record)?;
    session.finish()
}

/// Deserializes a record from text.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON, its version is newer than
/// `latest`, or its structure does not match the record.
pub fn from_str<T>(text: &str, latest: u32) -> Result<T>
where
    T: Record + Default,
{
    from_session(TextReader::from_str(text, latest)?)
}

/// Deserializes a record from a JSON [`Value`].
///
/// # Errors
///
/// Same as [`from_str`], minus the syntax errors.
pub fn from_value<T>(value: Value, latest: u32) -> Result<T>
where
    T: Record + Default,
{
    from_session(TextReader::from_value(value, latest)?)
}

fn from_session<T>(mut session: TextReader) -> Result<T>
where
    T: Record + Default,
{
    let mut record = T::default();
    session.read_root(&mut record)?;
    session.finish()?;
    Ok(record)
}
