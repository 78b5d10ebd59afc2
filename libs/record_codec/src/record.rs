use std::{fmt, io};

use crate::binary::ByteRead;
use crate::error::Result;
use crate::session::Session;
use crate::text::{TokenReader, TokenWriter};
use crate::vec3::Vec3;

/// A value that can describe its own fields to a [`Session`].
///
/// The same routine reads and writes: given a reading session, it must
/// populate `self` from the stream; given a writing session, it must push its
/// current field values.
///
/// Every field must be visited in the same order regardless of the session's
/// mode. The binary backend has no field names, so a different order between
/// writing and a later read of the same stream silently desynchronizes it.
pub trait Record {
    /// Visits every field of this record.
    ///
    /// # Errors
    ///
    /// Returns any error produced by the session. Implementations may also
    /// return their own validation errors via [`Error::custom`].
    ///
    /// [`Error::custom`]: crate::Error::custom
    fn serialize<S: Session>(&mut self, session: &mut S) -> Result<()>;
}

/// A record type that can be used as a nested member or array element.
///
/// When [`TAGGED`](Self::TAGGED) is `false`, exactly one concrete type is
/// assumed and no type tag is stored. Polymorphic families are closed enums
/// that set it to `true` and map tags to variants in [`create`](Self::create).
///
/// Use [`plain_member!`](crate::plain_member) for the common single-type case.
pub trait Member: Record + Sized {
    /// Name of the type family, used in error messages.
    const FAMILY: &'static str;
    /// Whether a type tag is stored ahead of every instance.
    const TAGGED: bool = false;

    /// Creates a new empty instance for the given type tag.
    ///
    /// Returns [`None`] if the tag is not known to the family. For untagged
    /// types, the tag is always `0`.
    fn create(tag: u8) -> Option<Self>;

    /// Gets the type tag of this instance.
    fn tag(&self) -> u8 {
        0
    }
}

/// Implements [`Member`] for untagged record types via [`Default`].
#[macro_export]
macro_rules! plain_member {
    ($($Ty:ty),* $(,)?) => { $(
        impl $crate::Member for $Ty {
            const FAMILY: &'static str = ::std::stringify!($Ty);

            fn create(_tag: u8) -> ::std::option::Option<Self> {
                ::std::option::Option::Some(<Self as ::std::default::Default>::default())
            }
        }
    )* };
}

mod private {
    pub trait Sealed {}
}

/// A primitive field type supported by every backend.
///
/// Implemented for [`i32`], [`f32`], and [`Vec3`]. This trait is sealed.
pub trait Scalar: Copy + PartialEq + fmt::Debug + private::Sealed {
    /// Writes the fixed-width binary form.
    #[doc(hidden)]
    fn write_bytes<W: io::Write>(self, writer: &mut W) -> io::Result<()>;

    /// Reads the fixed-width binary form.
    #[doc(hidden)]
    fn read_bytes<R: ByteRead>(reader: &mut R) -> Result<Self>;

    /// Writes the text form as a single value.
    #[doc(hidden)]
    fn write_token(self, writer: &mut TokenWriter) -> Result<()>;

    /// Reads the text form.
    #[doc(hidden)]
    fn read_token(reader: &mut TokenReader) -> Result<Self>;
}

impl private::Sealed for i32 {}
impl private::Sealed for f32 {}
impl private::Sealed for Vec3 {}

impl Scalar for i32 {
    fn write_bytes<W: io::Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_le_bytes())
    }

    fn read_bytes<R: ByteRead>(reader: &mut R) -> Result<Self> {
        reader.read_bytes().map(Self::from_le_bytes)
    }

    fn write_token(self, writer: &mut TokenWriter) -> Result<()> {
        writer.integer(self.into())
    }

    fn read_token(reader: &mut TokenReader) -> Result<Self> {
        let value = reader.integer()?;
        Self::try_from(value).map_err(|_| crate::Error::IntegerOutOfRange(value))
    }
}

impl Scalar for f32 {
    fn write_bytes<W: io::Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_le_bytes())
    }

    fn read_bytes<R: ByteRead>(reader: &mut R) -> Result<Self> {
        reader.read_bytes().map(Self::from_le_bytes)
    }

    fn write_token(self, writer: &mut TokenWriter) -> Result<()> {
        writer.float(self)
    }

    fn read_token(reader: &mut TokenReader) -> Result<Self> {
        reader.float()
    }
}

// a vector is positional in both backends: three floats, no names
impl Scalar for Vec3 {
    fn write_bytes<W: io::Write>(self, writer: &mut W) -> io::Result<()> {
        for v in self.to_array() {
            v.write_bytes(writer)?;
        }

        Ok(())
    }

    fn read_bytes<R: ByteRead>(reader: &mut R) -> Result<Self> {
        let x = f32::read_bytes(reader)?;
        let y = f32::read_bytes(reader)?;
        let z = f32::read_bytes(reader)?;
        Ok(Self::new(x, y, z))
    }

    fn write_token(self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_array()?;
        for v in self.to_array() {
            writer.float(v)?;
        }

        writer.end_array()
    }

    fn read_token(reader: &mut TokenReader) -> Result<Self> {
        reader.start_array()?;
        let x = reader.float()?;
        let y = reader.float()?;
        let z = reader.float()?;
        reader.end_array()?;
        Ok(Self::new(x, y, z))
    }
}
