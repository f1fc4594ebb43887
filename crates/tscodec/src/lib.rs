//! # tscodec
//!
//! Column compression for time-series storage: one codec for `i64` samples
//! and one for `f64` samples.
//!
//! Both codecs turn a slice of values into a self-describing byte buffer and
//! back. Compression never fails: when the compressed scheme cannot
//! represent a column, or would not make it smaller, the values are stored
//! raw instead. The first byte of every buffer names the encoding, so the
//! decoder always knows which one was chosen.
//!
//! ## Modules
//!
//! - [`format`] - Buffer header (encoding tag and element count)
//! - [`numeric`] - Overflow check and zigzag mapping
//! - [`simple8b`] - Delta + zigzag + Simple8b packing for integers
//! - [`xor`] - XOR-delta byte truncation for floats
//! - [`column`] - Typed dispatch and compression statistics
//!
//! ## Encodings
//!
//! | Tag | Encoding | Body |
//! |-----|----------|------|
//! | 0 | RawInt64 | big-endian `i64` values |
//! | 1 | PackedInt64 | big-endian 64-bit Simple8b words |
//! | 2 | RawFloat64 | big-endian `f64` values |
//! | 3 | XorFloat64 | paired flag bytes + truncated XOR deltas |
//!
//! ## Example
//!
//! ```
//! use tscodec::{compress_int64, decompress_int64, peek_header, EncodingType};
//!
//! let mut values = vec![0i64; 23];
//! values.push(10_000_000);
//!
//! let compressed = compress_int64(&values);
//! assert_eq!(peek_header(&compressed)?.encoding, EncodingType::PackedInt64);
//! assert!(compressed.len() < values.len() * 8);
//!
//! assert_eq!(decompress_int64(&compressed)?, values);
//! # Ok::<(), tscodec::CodecError>(())
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod column;
mod error;
pub mod format;
pub mod numeric;
pub mod simple8b;
pub mod xor;

pub use column::{ColumnCompressor, ColumnType, ColumnValues, CompressionStats};
pub use error::{CodecError, Result};
pub use format::{peek_header, EncodingType, Header, HEADER_LEN};
pub use numeric::{safe_add, zigzag_decode, zigzag_encode};
pub use simple8b::{compress_int64, decompress_int64};
pub use xor::{compress_float64, decompress_float64};
