//! Typed column dispatch and compression statistics.
//!
//! [`ColumnCompressor`] picks the codec from the value type, and on the way
//! back reads the tag byte to decide which decoder to run. Callers that store
//! mixed columns can hand any buffer to [`ColumnCompressor::decompress`]
//! without tracking the type separately.

use serde::Serialize;

use crate::error::Result;
use crate::format::{peek_header, EncodingType};
use crate::simple8b::{compress_int64, decompress_int64};
use crate::xor::{compress_float64, decompress_float64};

/// Logical value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnType {
    /// 64-bit signed integers.
    Int64,
    /// 64-bit floats.
    Float64,
}

impl ColumnType {
    /// Returns a human-readable name for the type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
        }
    }

    /// Returns the value type an encoding carries.
    #[must_use]
    pub fn of_encoding(encoding: EncodingType) -> Self {
        if encoding.is_int64() {
            Self::Int64
        } else {
            Self::Float64
        }
    }
}

/// An owned column of values.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Integer samples.
    Int64(Vec<i64>),
    /// Floating point samples.
    Float64(Vec<f64>),
}

impl ColumnValues {
    /// Returns the value type.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Int64(_) => ColumnType::Int64,
            Self::Float64(_) => ColumnType::Float64,
        }
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Int64(v) => v.len(),
            Self::Float64(v) => v.len(),
        }
    }

    /// Returns true if the column has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<i64>> for ColumnValues {
    fn from(values: Vec<i64>) -> Self {
        Self::Int64(values)
    }
}

impl From<Vec<f64>> for ColumnValues {
    fn from(values: Vec<f64>) -> Self {
        Self::Float64(values)
    }
}

/// Compresses and decompresses columns of either value type.
pub struct ColumnCompressor;

impl ColumnCompressor {
    /// Compresses a column with the codec for its value type.
    pub fn compress(values: &ColumnValues) -> Vec<u8> {
        match values {
            ColumnValues::Int64(v) => compress_int64(v),
            ColumnValues::Float64(v) => compress_float64(v),
        }
    }

    /// Decompresses any buffer produced by [`Self::compress`].
    pub fn decompress(data: &[u8]) -> Result<ColumnValues> {
        let header = peek_header(data)?;
        match ColumnType::of_encoding(header.encoding) {
            ColumnType::Int64 => decompress_int64(data).map(ColumnValues::Int64),
            ColumnType::Float64 => decompress_float64(data).map(ColumnValues::Float64),
        }
    }
}

/// Size summary of a compressed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionStats {
    /// Encoding chosen for the buffer.
    pub encoding: EncodingType,
    /// Number of values stored.
    pub count: usize,
    /// Size of the buffer in bytes, header included.
    pub compressed_bytes: usize,
    /// Size of the values as plain 8-byte words.
    pub uncompressed_bytes: usize,
}

impl CompressionStats {
    /// Reads the header of `data` and measures it.
    pub fn from_buffer(data: &[u8]) -> Result<Self> {
        let header = peek_header(data)?;
        Ok(Self {
            encoding: header.encoding,
            count: header.len(),
            compressed_bytes: data.len(),
            uncompressed_bytes: header.len() * 8,
        })
    }

    /// Returns the compression ratio (original / compressed).
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.compressed_bytes == 0 {
            return 1.0;
        }
        self.uncompressed_bytes as f64 / self.compressed_bytes as f64
    }

    /// Returns compressed bytes per uncompressed byte.
    #[must_use]
    pub fn compress_rate(&self) -> f64 {
        if self.uncompressed_bytes == 0 {
            return 1.0;
        }
        self.compressed_bytes as f64 / self.uncompressed_bytes as f64
    }

    /// Returns whether a packed or XOR encoding was used.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        !self.encoding.is_raw()
    }
}
