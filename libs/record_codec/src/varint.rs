//! 7-bit chunked variable-length integers.
//!
//! Each byte carries 7 value bits, least significant chunk first. The high bit
//! of a byte is set when another byte follows. At most 5 bytes are used, so
//! values are limited to 35 bits.
//!
//! The object framing does not use this encoding; fixed scalar fields are
//! always stored at their full width so headers can be patched in place.

use std::io;

use crate::binary::ByteRead;
use crate::error::{Error, Result};

/// Maximum amount of bytes per encoded value.
pub const MAX_CHUNKS: usize = 5;

/// Largest value that can be encoded.
pub const MAX_VALUE: u64 = (1 << (7 * MAX_CHUNKS)) - 1;

/// Writes `x` in the 7-bit chunked encoding.
///
/// # Errors
///
/// Returns [`Error::VarIntTooLarge`] if `x` exceeds [`MAX_VALUE`] or any error
/// of the writer.
pub fn write<W>(mut writer: W, mut x: u64) -> Result<()>
where
    W: io::Write,
{
    if x > MAX_VALUE {
        return Err(Error::VarIntTooLarge(x));
    }

    let mut buf = [0u8; MAX_CHUNKS];
    let mut i = 0usize;
    while x >= 0x80 {
        buf[i] = trunc_u8(x) | 0x80;
        x >>= 7;
        i += 1;
    }

    buf[i] = trunc_u8(x);
    i += 1;

    Ok(writer.write_all(&buf[..i])?)
}

/// Reads a value in the 7-bit chunked encoding.
///
/// # Errors
///
/// Returns [`Error::VarIntOverflow`] if a sixth byte would be needed or any
/// error of the reader.
pub fn read<R>(mut reader: R) -> Result<u64>
where
    R: ByteRead,
{
    let mut x = 0u64;
    let mut s = 0usize;
    loop {
        // a corrupt stream could keep the continuation bit set forever
        if s == 7 * MAX_CHUNKS {
            return Err(Error::VarIntOverflow);
        }

        let b = reader.read_u8()?;
        x |= u64::from(b & 0x7F) << s;
        s += 7;

        if b < 0x80 {
            return Ok(x);
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn trunc_u8(x: u64) -> u8 {
    x as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(x: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        write(&mut buf, x).expect("value fits");
        buf
    }

    #[test]
    fn round_trip() {
        for v in [0, 1, 0x7F, 0x80, 300, 500_000, u64::from(u32::MAX), MAX_VALUE] {
            let buf = encode(v);
            let r = read(buf.as_slice()).expect("decoding worked");
            assert_eq!(v, r, "must be equal");
        }
    }

    #[test]
    fn chunk_layout() {
        assert_eq!(encode(0), [0x00], "zero is one byte");
        assert_eq!(encode(0x7F), [0x7F], "largest single byte");
        assert_eq!(encode(300), [0xAC, 0x02], "low chunk first");
        assert_eq!(encode(MAX_VALUE).len(), MAX_CHUNKS, "largest value uses all chunks");
    }

    #[test]
    fn too_large_to_write() {
        let mut buf = Vec::new();
        let err = write(&mut buf, MAX_VALUE + 1).expect_err("36 bits");
        assert!(matches!(err, Error::VarIntTooLarge(_)), "wrong error: {err:?}");
        assert!(buf.is_empty(), "nothing written");
    }

    #[test]
    fn sixth_byte_is_corrupt() {
        let data: &[u8] = &[0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        let err = read(data).expect_err("six bytes");
        assert!(matches!(err, Error::VarIntOverflow), "wrong error: {err:?}");
    }

    #[test]
    fn truncated() {
        let data: &[u8] = &[0x80, 0x80];
        let err = read(data).expect_err("continuation without next byte");
        assert_eq!(err.kind(), crate::ErrorKind::Format, "eof is a format error");
    }
}
