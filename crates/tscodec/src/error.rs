//! Error types for decoding codec buffers.
//!
//! Encoding never fails: any condition that would break the packed or XOR
//! schemes falls back to the raw format inside the same call. Only decoding
//! reports errors.

use std::io;

use thiserror::Error;

use crate::format::EncodingType;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Error returned when a buffer cannot be decoded.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A read ran past the end of the buffer or otherwise failed.
    #[error("read error: {0}")]
    Io(#[from] io::Error),

    /// The leading tag byte does not name a known encoding.
    #[error("unknown encoding tag: {0}")]
    UnknownEncoding(u8),

    /// The buffer holds a different value type than the decoder expects.
    #[error("encoding mismatch: expected {expected} buffer, found {found}")]
    EncodingMismatch {
        /// Value type the decoder handles.
        expected: &'static str,
        /// Encoding found in the buffer header.
        found: EncodingType,
    },

    /// The stream ended before the declared element count was reached.
    #[error("truncated stream: expected {expected} values, decoded {decoded}")]
    Truncated {
        /// Element count from the header.
        expected: usize,
        /// Values decoded before the stream ran out.
        decoded: usize,
    },
}

impl CodecError {
    /// Converts a failed body read into an error, reporting how far decoding got.
    pub(crate) fn short_read(err: io::Error, expected: usize, decoded: usize) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated { expected, decoded }
        } else {
            Self::Io(err)
        }
    }

    /// Returns true if the error was caused by running out of input.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        match self {
            Self::Io(e) => e.kind() == io::ErrorKind::UnexpectedEof,
            Self::Truncated { .. } => true,
            _ => false,
        }
    }
}
