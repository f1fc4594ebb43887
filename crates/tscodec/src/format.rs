//! Buffer framing shared by both codecs.
//!
//! Every buffer starts with the same five bytes:
//!
//! | Bytes | Meaning |
//! |-------|---------|
//! | 0 | Encoding tag (see [`EncodingType`]) |
//! | 1-4 | Element count, big-endian `u32` |
//! | 5.. | Encoding-specific body |

use std::fmt;
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::BufMut;
use serde::Serialize;

use crate::error::{CodecError, Result};

/// Length of the tag + count prefix.
pub const HEADER_LEN: usize = 5;

/// Encoding tag stored in the first byte of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum EncodingType {
    /// Uncompressed big-endian `i64` values.
    RawInt64 = 0,
    /// Delta + zigzag + Simple8b packed words.
    PackedInt64 = 1,
    /// Uncompressed big-endian `f64` values.
    RawFloat64 = 2,
    /// XOR deltas truncated to their significant bytes.
    XorFloat64 = 3,
}

impl EncodingType {
    /// Returns the tag byte for this encoding.
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Returns a human-readable name for the encoding.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::RawInt64 => "RawInt64",
            Self::PackedInt64 => "PackedInt64",
            Self::RawFloat64 => "RawFloat64",
            Self::XorFloat64 => "XorFloat64",
        }
    }

    /// Returns whether the body is stored uncompressed.
    #[must_use]
    pub fn is_raw(self) -> bool {
        matches!(self, Self::RawInt64 | Self::RawFloat64)
    }

    /// Returns whether this encoding carries `i64` values.
    #[must_use]
    pub fn is_int64(self) -> bool {
        matches!(self, Self::RawInt64 | Self::PackedInt64)
    }

    /// Returns whether this encoding carries `f64` values.
    #[must_use]
    pub fn is_float64(self) -> bool {
        matches!(self, Self::RawFloat64 | Self::XorFloat64)
    }
}

impl TryFrom<u8> for EncodingType {
    type Error = CodecError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Self::RawInt64),
            1 => Ok(Self::PackedInt64),
            2 => Ok(Self::RawFloat64),
            3 => Ok(Self::XorFloat64),
            other => Err(CodecError::UnknownEncoding(other)),
        }
    }
}

impl fmt::Display for EncodingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded buffer prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    /// How the body is encoded.
    pub encoding: EncodingType,
    /// Number of logical values in the body.
    pub count: u32,
}

impl Header {
    /// Creates a header for `len` values.
    ///
    /// # Panics
    ///
    /// Panics if `len` does not fit in the 32-bit count field.
    pub fn new(encoding: EncodingType, len: usize) -> Self {
        assert!(
            u32::try_from(len).is_ok(),
            "can only compress at most {} values, got {}",
            u32::MAX,
            len
        );
        Self {
            encoding,
            count: len as u32,
        }
    }

    /// Appends the five header bytes to `buf`.
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.encoding.tag());
        buf.put_u32(self.count);
    }

    /// Reads a header from the front of `reader`.
    pub fn read_from(reader: &mut Cursor<&[u8]>) -> Result<Self> {
        let tag = reader.read_u8()?;
        let count = reader.read_u32::<BigEndian>()?;
        Ok(Self {
            encoding: EncodingType::try_from(tag)?,
            count,
        })
    }

    /// Returns the element count as a `usize`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count as usize
    }

    /// Returns true if the buffer holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Reads the header of `data` without decoding the body.
pub fn peek_header(data: &[u8]) -> Result<Header> {
    Header::read_from(&mut Cursor::new(data))
}

/// Starts a fresh output buffer with a header already written.
pub(crate) fn start_buffer(encoding: EncodingType, len: usize, body_capacity: usize) -> Vec<u8> {
    let header = Header::new(encoding, len);
    let mut buf = Vec::with_capacity(HEADER_LEN + body_capacity);
    header.write_to(&mut buf);
    buf
}
