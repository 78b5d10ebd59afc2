//! Exposes a specialized reader trait.

use std::io;

use crate::error::{Error, Result};

/// Specialized reader trait for use with [`BinaryReader`](super::BinaryReader).
///
/// By default, this is implemented for `&[u8]` (byte slices), [`IoRead`] and
/// mutable references to [`ByteRead`] implementations.
pub trait ByteRead {
    /// Reads a constant size chunk of bytes.
    ///
    /// # Errors
    ///
    /// Returns an [`io::ErrorKind::UnexpectedEof`] error if fewer than `N`
    /// bytes are left, or any error of the underlying reader.
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]>;

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// Same as [`read_bytes`](Self::read_bytes).
    fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes().map(|[b]| b)
    }
}

// this implementation is required so the reader can be reborrowed
impl<R: ByteRead> ByteRead for &mut R {
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        (**self).read_bytes()
    }
}

impl ByteRead for &[u8] {
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let (out, rem) = self.split_first_chunk::<N>().ok_or_else(Error::eof)?;
        *self = rem;
        Ok(*out)
    }
}

/// Wraps a [`io::Read`] implementation so it can be used as a [`ByteRead`].
///
/// You cannot directly construct this type, instead use
/// [`from_reader`](super::from_reader).
#[derive(Debug)]
pub struct IoRead<R> {
    pub(super) inner: R,
}

impl<R> IoRead<R> {
    pub(super) fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: io::Read> ByteRead for IoRead<R> {
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_advances() {
        let mut slice: &[u8] = &[1, 2, 3, 4, 5];
        let head: [u8; 4] = slice.read_bytes().expect("enough bytes");
        assert_eq!(head, [1, 2, 3, 4], "first chunk");
        assert_eq!(slice.read_u8().expect("one byte left"), 5, "last byte");

        let err = slice.read_u8().expect_err("slice is empty");
        assert_eq!(err.kind(), crate::ErrorKind::Format, "truncation is a format error");
    }
}
