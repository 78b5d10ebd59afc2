use std::io::{self, SeekFrom};

use super::frame::{FrameStack, PLACEHOLDER};
use super::{END_ARRAY, END_OBJECT};
use crate::error::{Error, Result};
use crate::record::{Member, Record, Scalar};
use crate::session::Session;
use crate::varint;
use crate::version::{Versions, gate};

/// A writing [`Session`] for the binary format.
///
/// The writer is owned by the session until [`finish`](Self::finish) hands it
/// back. If the session is dropped early, such as when a record fails halfway
/// through, the writer is dropped with it.
#[derive(Debug)]
pub struct BinaryWriter<W> {
    writer: W,
    latest: u32,
    version: u32,
    frames: FrameStack,
}

impl<W: io::Write + io::Seek> BinaryWriter<W> {
    /// Creates a session writing the latest version and writes the stream
    /// header.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the header fails.
    pub fn new(writer: W, latest: u32) -> Result<Self> {
        Self::with_version(writer, latest, latest)
    }

    /// Creates a session writing an older version and writes the stream
    /// header.
    ///
    /// Fields not present in `version` are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if `version` is newer than `latest` or writing the
    /// header fails.
    pub fn with_version(mut writer: W, latest: u32, version: u32) -> Result<Self> {
        if version > latest {
            return Err(Error::UnsupportedVersion {
                found: version.into(),
                latest,
            });
        }

        writer.write_all(&version.to_le_bytes())?;
        log::trace!("write version header: {version}");

        Ok(Self {
            writer,
            latest,
            version,
            frames: FrameStack::default(),
        })
    }

    /// Writes the root record as one object frame.
    ///
    /// # Errors
    ///
    /// Returns any error of the record or the writer.
    pub fn write_root<T>(&mut self, record: &mut T) -> Result<()>
    where
        T: Record + ?Sized,
    {
        self.begin_object()?;
        record.serialize(self)?;
        self.end_object()
    }

    /// Writes a 7-bit encoded unsigned integer at the current position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VarIntTooLarge`] if the value needs more than 35 bits.
    pub fn write_var_uint(&mut self, value: u64) -> Result<()> {
        varint::write(&mut self.writer, value)
    }

    /// Flushes and unwraps the session into its inner writer.
    ///
    /// # Errors
    ///
    /// Returns an error if an object is still open or flushing fails.
    pub fn finish(mut self) -> Result<W> {
        if self.frames.depth() != 0 {
            return Err(Error::custom("binary writer finished with open objects"));
        }

        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Reserves the header of a new object.
    fn begin_object(&mut self) -> Result<()> {
        let offset = self.writer.stream_position()?;
        self.writer.write_all(&PLACEHOLDER.to_le_bytes())?;
        self.frames.push(0, offset);

        log::trace!("write temp object header at byte {offset}");
        Ok(())
    }

    /// Patches the header of the innermost object and closes it.
    fn end_object(&mut self) -> Result<()> {
        let frame = self.frames.pop()?;
        let current = self.writer.stream_position()?;
        self.writer.seek(SeekFrom::Start(frame.header_offset))?;
        self.writer.write_all(&frame.bitmask.to_le_bytes())?;
        self.writer.seek(SeekFrom::Start(current))?;
        self.writer.write_all(&[END_OBJECT])?;

        log::trace!(
            "write final object header {:#034b} at byte {}",
            frame.bitmask,
            frame.header_offset
        );
        Ok(())
    }

    fn write_member<T: Member>(&mut self, member: &mut T) -> Result<()> {
        self.begin_object()?;
        if T::TAGGED {
            let tag = member.tag();
            self.writer.write_all(&[tag])?;
            log::trace!("write type tag {tag} for {}", T::FAMILY);
        }

        member.serialize(self)?;
        self.end_object()
    }
}

impl<W: io::Write + io::Seek> Session for BinaryWriter<W> {
    fn is_reading(&self) -> bool {
        false
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
        if !gate(name, versions, self.version, self.latest)? {
            return Ok(());
        }

        if self.frames.flag(name, *value != default)? {
            value.write_bytes(&mut self.writer)?;
            log::trace!("write `{name}`: {value:?}");
        }

        Ok(())
    }

    fn object<T: Member>(
        &mut self,
        name: &str,
        value: &mut Option<T>,
        versions: Versions,
    ) -> Result<()> {
        if !gate(name, versions, self.version, self.latest)? {
            return Ok(());
        }

        if !self.frames.flag(name, value.is_some())? {
            return Ok(());
        }

        match value {
            Some(member) => self.write_member(member),
            None => Ok(()),
        }
    }

    fn object_array<T: Member>(
        &mut self,
        name: &str,
        values: &mut Vec<T>,
        versions: Versions,
    ) -> Result<()> {
        if !gate(name, versions, self.version, self.latest)? {
            return Ok(());
        }

        let len = u16::try_from(values.len()).map_err(|_| Error::ArrayTooLong {
            name: name.to_owned(),
            len: values.len(),
        })?;

        if !self.frames.flag(name, len != 0)? {
            return Ok(());
        }

        self.writer.write_all(&len.to_le_bytes())?;
        log::trace!("write array `{name}` size {len}");

        for member in &mut *values {
            self.write_member(member)?;
        }

        self.writer.write_all(&[END_ARRAY])?;
        Ok(())
    }
}
