use super::frame::{FrameStack, RESERVED_BIT};
use super::read::ByteRead;
use super::{END_ARRAY, END_OBJECT};
use crate::error::{Error, Result};
use crate::record::{Member, Record, Scalar};
use crate::session::Session;
use crate::varint;
use crate::version::{Versions, gate};

/// A reading [`Session`] for the binary format.
#[derive(Debug)]
pub struct BinaryReader<R> {
    reader: R,
    latest: u32,
    version: u32,
    frames: FrameStack,
}

impl<R: ByteRead> BinaryReader<R> {
    /// Creates a session and reads the stream header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is truncated or the stream's version is
    /// newer than `latest`.
    pub fn new(mut reader: R, latest: u32) -> Result<Self> {
        let version = u32::from_le_bytes(reader.read_bytes()?);
        if version > latest {
            return Err(Error::UnsupportedVersion {
                found: version.into(),
                latest,
            });
        }

        log::trace!("read version header: {version}");
        Ok(Self {
            reader,
            latest,
            version,
            frames: FrameStack::default(),
        })
    }

    /// Reads the root record's object frame into `record`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is malformed or truncated.
    pub fn read_root<T>(&mut self, record: &mut T) -> Result<()>
    where
        T: Record + ?Sized,
    {
        self.begin_object("<root>")?;
        record.serialize(self)?;
        self.end_object("<root>")
    }

    /// Reads a 7-bit encoded unsigned integer at the current position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VarIntOverflow`] if the encoding is longer than 5
    /// bytes.
    pub fn read_var_uint(&mut self) -> Result<u64> {
        varint::read(&mut self.reader)
    }

    /// Unwraps the session into its inner reader.
    ///
    /// # Errors
    ///
    /// Returns an error if an object is still open.
    pub fn finish(self) -> Result<R> {
        if self.frames.depth() != 0 {
            return Err(Error::custom("binary reader finished with open objects"));
        }

        Ok(self.reader)
    }

    fn begin_object(&mut self, name: &str) -> Result<()> {
        let bitmask = u32::from_le_bytes(self.reader.read_bytes()?);
        if bitmask & RESERVED_BIT != 0 {
            return Err(Error::UnfinishedHeader {
                name: name.to_owned(),
                bitmask,
            });
        }

        self.frames.push(bitmask, 0);
        log::trace!("read object header {bitmask:#034b} for `{name}`");
        Ok(())
    }

    fn end_object(&mut self, name: &str) -> Result<()> {
        self.frames.pop()?;
        let found = self.reader.read_u8()?;
        if found != END_OBJECT {
            return Err(Error::MissingObjectEnd {
                name: name.to_owned(),
                found,
            });
        }

        Ok(())
    }

    fn read_member<T: Member>(&mut self, name: &str) -> Result<T> {
        self.begin_object(name)?;
        let tag = if T::TAGGED {
            self.reader.read_u8()?
        } else {
            0
        };

        let mut member = T::create(tag).ok_or(Error::UnknownTag {
            family: T::FAMILY,
            tag: tag.into(),
        })?;

        member.serialize(self)?;
        self.end_object(name)?;
        Ok(member)
    }
}

impl<'a> BinaryReader<&'a [u8]> {
    /// Gets the remaining unread part of the slice.
    pub fn remainder(&self) -> &'a [u8] {
        self.reader
    }
}

impl<R: ByteRead> Session for BinaryReader<R> {
    fn is_reading(&self) -> bool {
        true
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn latest_version(&self) -> u32 {
        self.latest
    }

    fn scalar<T: Scalar>(
        &mut self,
        name: &str,
        value: &mut T,
        default: T,
        versions: Versions,
    ) -> Result<()> {
        // absent and defaulted fields have no bytes in the stream
        *value = if gate(name, versions, self.version, self.latest)? && self.frames.test(name)? {
            T::read_bytes(&mut self.reader)?
        } else {
            default
        };

        Ok(())
    }

    fn object<T: Member>(
        &mut self,
        name: &str,
        value: &mut Option<T>,
        versions: Versions,
    ) -> Result<()> {
        *value = if gate(name, versions, self.version, self.latest)? && self.frames.test(name)? {
            Some(self.read_member(name)?)
        } else {
            None
        };

        Ok(())
    }

    fn object_array<T: Member>(
        &mut self,
        name: &str,
        values: &mut Vec<T>,
        versions: Versions,
    ) -> Result<()> {
        values.clear();
        if !gate(name, versions, self.version, self.latest)? || !self.frames.test(name)? {
            return Ok(());
        }

        let len = u16::from_le_bytes(self.reader.read_bytes()?);
        log::trace!("read array `{name}` size {len}");

        values.reserve(len.into());
        for _ in 0..len {
            let member = self.read_member(name)?;
            values.push(member);
        }

        let found = self.reader.read_u8()?;
        if found != END_ARRAY {
            return Err(Error::MissingArrayEnd {
                name: name.to_owned(),
                found,
            });
        }

        Ok(())
    }
}
