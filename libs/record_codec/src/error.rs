//! Error handling types.
//!
//! Both backends share one error type. Every error is fatal for the save or
//! load it occurred in; there is no partial-object recovery.

use std::{fmt, io};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Potential errors to encounter when writing or reading records.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The error originated from the underlying [`io::Write`] or [`io::Read`]
    /// implementation.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A field's version range lies entirely past the latest known version.
    /// The version constant of the record family was likely never bumped.
    #[error("field `{name}` starts at version {first}, but the latest version is {latest}")]
    VersionNotBumped {
        /// The name of the field.
        name: String,
        /// The first version of the field.
        first: u32,
        /// The latest version known to the session.
        latest: u32,
    },
    /// A record declared more fields than fit into one object frame.
    #[error("field `{name}` exceeds the limit of 31 fields per object; combine fields into a nested record")]
    TooManyFields {
        /// The name of the first field that did not fit.
        name: String,
    },
    /// An array has more elements than the binary format can count.
    #[error("array `{name}` has {len} elements, but at most 65535 are supported")]
    ArrayTooLong {
        /// The name of the array field.
        name: String,
        /// The actual element count.
        len: usize,
    },
    /// The requested or stored version is newer than the latest known version.
    #[error("version {found} is newer than the latest supported version {latest}")]
    UnsupportedVersion {
        /// The requested or stored version.
        found: u64,
        /// The latest version known to the session.
        latest: u32,
    },
    /// A value is too large to be 7-bit encoded in at most 5 bytes.
    #[error("value {0} does not fit into 35 bits")]
    VarIntTooLarge(u64),
    /// A session operation was used while no object was open.
    #[error("no object is currently open")]
    NoOpenObject,
    /// The same property was written twice into one text object.
    #[error("property `{0}` was written twice into the same object")]
    DuplicateProperty(String),

    /// The end-of-object marker was not where it was expected.
    #[error("expected end of object `{name}`, but found byte {found:#04x}")]
    MissingObjectEnd {
        /// The name of the object field.
        name: String,
        /// The byte found instead.
        found: u8,
    },
    /// The end-of-array marker was not where it was expected.
    #[error("expected end of array `{name}`, but found byte {found:#04x}")]
    MissingArrayEnd {
        /// The name of the array field.
        name: String,
        /// The byte found instead.
        found: u8,
    },
    /// An object header still holds the placeholder written before its fields.
    #[error("header of object `{name}` was never completed: {bitmask:#010x}")]
    UnfinishedHeader {
        /// The name of the object field.
        name: String,
        /// The stored bitmask.
        bitmask: u32,
    },
    /// A 7-bit encoded integer continued past its fifth byte.
    #[error("7-bit encoded integer is longer than 5 bytes")]
    VarIntOverflow,
    /// A polymorphic member had a type tag that maps to no variant.
    #[error("unknown type tag {tag} for `{family}`")]
    UnknownTag {
        /// The family name of the member type.
        family: &'static str,
        /// The tag that was read.
        tag: i64,
    },
    /// The text stream held a different token than the reader expected.
    #[error("expected {expected}, but found {found}")]
    UnexpectedToken {
        /// A description of the expected token.
        expected: &'static str,
        /// A description of the token found instead.
        found: String,
    },
    /// An integer in the text stream does not fit the target type.
    #[error("integer {0} is out of range")]
    IntegerOutOfRange(i64),
    /// JSON cannot represent infinite or NaN floats.
    #[error("float {0} cannot be represented as text")]
    NonFiniteFloat(f32),
    /// The text container could not be parsed or printed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Bytes were left over after the root object.
    #[error("trailing bytes past the end of the root object")]
    TrailingBytes,
    /// Another reason provided by the record implementation.
    #[error("{0}")]
    Custom(String),
}

/// The broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A programming error in a record declaration or session setup.
    Configuration,
    /// The stream is corrupt, truncated, or otherwise malformed.
    Format,
    /// The underlying reader or writer failed.
    Io,
}

impl Error {
    /// Constructs a [`Error::Custom`] variant with the provided message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }

    /// Gets the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof => ErrorKind::Format,
            Self::Io(_) => ErrorKind::Io,
            Self::VersionNotBumped { .. }
            | Self::TooManyFields { .. }
            | Self::ArrayTooLong { .. }
            | Self::VarIntTooLarge(_)
            | Self::NoOpenObject
            | Self::DuplicateProperty(_)
            | Self::NonFiniteFloat(_) => ErrorKind::Configuration,
            Self::UnsupportedVersion { .. }
            | Self::MissingObjectEnd { .. }
            | Self::MissingArrayEnd { .. }
            | Self::UnfinishedHeader { .. }
            | Self::VarIntOverflow
            | Self::UnknownTag { .. }
            | Self::UnexpectedToken { .. }
            | Self::IntegerOutOfRange(_)
            | Self::Json(_)
            | Self::TrailingBytes
            | Self::Custom(_) => ErrorKind::Format,
        }
    }

    /// Returns an [`io::Error`] with kind [`io::ErrorKind::UnexpectedEof`].
    pub(crate) fn eof() -> Self {
        io::Error::from(io::ErrorKind::UnexpectedEof).into()
    }
}
