//! Delta + zigzag + Simple8b codec for `i64` columns.
//!
//! Each value is stored as the zigzag-encoded difference from the value
//! before it (the first value is measured against 0). Differences are packed
//! into 64-bit words: the low 4 bits hold a selector that fixes the field
//! width, the remaining 60 bits hold as many equal-width fields as fit.
//!
//! | Selector | Bits | Values/word |
//! |----------|------|-------------|
//! | 0 | 0 | 240 |
//! | 1 | 0 | 120 |
//! | 2 | 1 | 60 |
//! | 3 | 2 | 30 |
//! | 4 | 3 | 20 |
//! | 5 | 4 | 15 |
//! | 6 | 5 | 12 |
//! | 7 | 6 | 10 |
//! | 8 | 7 | 8 |
//! | 9 | 8 | 7 |
//! | 10 | 10 | 6 |
//! | 11 | 12 | 5 |
//! | 12 | 15 | 4 |
//! | 13 | 20 | 3 |
//! | 14 | 30 | 2 |
//! | 15 | 60 | 1 |
//!
//! If any difference overflows `i64`, is too wide for a 60-bit field, or the
//! packed output would outgrow the raw layout, the whole column is written
//! raw instead. A buffer is never partly packed.

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::BufMut;

use crate::error::{CodecError, Result};
use crate::format::{start_buffer, EncodingType, Header, HEADER_LEN};
use crate::numeric::{checked_delta, zigzag_decode, zigzag_encode};

/// Zigzag magnitudes at or above this are never packed.
pub const MAX_PACKABLE: u64 = (1 << 61) - 1;

const SELECTOR_BITS: u32 = 4;
const SELECTOR_MASK: u64 = (1 << SELECTOR_BITS) - 1;

/// Field width in bits for each selector.
pub(crate) const BITS_PER_VALUE: [u32; 16] = [0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 10, 12, 15, 20, 30, 60];

/// Number of fields in a word for each selector.
pub(crate) const VALUES_PER_WORD: [usize; 16] =
    [240, 120, 60, 30, 20, 15, 12, 10, 8, 7, 6, 5, 4, 3, 2, 1];

/// Smallest selector whose field holds a value of the given bit length.
const SELECTOR_FOR_BITS: [usize; 61] = [
    0, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 11, 11, 12, 12, 12, 13, 13, 13, 13, 13, // 0..=20
    14, 14, 14, 14, 14, 14, 14, 14, 14, 14, // 21..=30
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, // 31..=45
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, // 46..=60
];

/// Why a column could not be packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fallback {
    /// `value - previous` overflows `i64`.
    DeltaOverflow { index: usize },
    /// The zigzag delta does not fit any selector.
    ValueTooLarge { index: usize, zigzag: u64 },
    /// Packed output would exceed the raw byte budget.
    ByteBudget,
}

/// Compresses `values`, falling back to raw storage when packing cannot help.
///
/// # Panics
///
/// Panics if `values` holds more than `u32::MAX` elements.
pub fn compress_int64(values: &[i64]) -> Vec<u8> {
    match encode_packed(values) {
        Ok(buf) => {
            tracing::trace!(
                count = values.len(),
                bytes = buf.len(),
                "packed int64 column"
            );
            buf
        }
        Err(reason) => {
            tracing::debug!(count = values.len(), ?reason, "falling back to raw int64 encoding");
            encode_raw(values)
        }
    }
}

/// Decodes a buffer produced by [`compress_int64`].
pub fn decompress_int64(data: &[u8]) -> Result<Vec<i64>> {
    let mut reader = Cursor::new(data);
    let header = Header::read_from(&mut reader)?;
    match header.encoding {
        EncodingType::RawInt64 => decode_raw(&mut reader, header.len()),
        EncodingType::PackedInt64 => decode_packed(&mut reader, header.len()),
        found => Err(CodecError::EncodingMismatch {
            expected: "int64",
            found,
        }),
    }
}

/// Returns the selector needed for a zigzag value, if any selector fits it.
fn selector_for(zigzag: u64) -> Option<usize> {
    let bits = (u64::BITS - zigzag.leading_zeros()) as usize;
    SELECTOR_FOR_BITS.get(bits).copied()
}

fn field_mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

fn encode_packed(values: &[i64]) -> std::result::Result<Vec<u8>, Fallback> {
    let byte_limit = 8 * values.len() + HEADER_LEN;
    let mut buf = start_buffer(EncodingType::PackedInt64, values.len(), values.len());
    let mut prev = 0i64;
    let mut pos = 0;

    while pos < values.len() {
        let (selector, count) = plan_word(values, pos, prev)?;
        let bits = BITS_PER_VALUE[selector];
        let mask = field_mask(bits);

        let mut word = selector as u64;
        for (k, &value) in values[pos..pos + count].iter().enumerate() {
            // plan_word already proved this delta fits
            let zigzag = zigzag_encode(value.wrapping_sub(prev));
            word |= (zigzag & mask) << (SELECTOR_BITS + bits * k as u32);
            prev = value;
        }
        pos += count;

        if buf.len() + 8 > byte_limit {
            return Err(Fallback::ByteBudget);
        }
        buf.put_u64(word);
    }

    Ok(buf)
}

/// Picks the selector and element count for the word starting at `start`.
///
/// Always returns a count of at least one.
fn plan_word(
    values: &[i64],
    start: usize,
    baseline: i64,
) -> std::result::Result<(usize, usize), Fallback> {
    let mut selector = 0;
    let mut count = 0;
    let mut trial = baseline;

    for (offset, &value) in values[start..].iter().enumerate() {
        let index = start + offset;
        let delta = checked_delta(value, trial).ok_or(Fallback::DeltaOverflow { index })?;
        let zigzag = zigzag_encode(delta);
        if zigzag >= MAX_PACKABLE {
            return Err(Fallback::ValueTooLarge { index, zigzag });
        }
        let needed = selector_for(zigzag).ok_or(Fallback::ValueTooLarge { index, zigzag })?;

        if count < VALUES_PER_WORD[selector] && count < VALUES_PER_WORD[needed] {
            selector = selector.max(needed);
            count += 1;
        } else {
            // Widen until the capacity no longer exceeds what was scanned,
            // then leave the surplus for the next word.
            while count < VALUES_PER_WORD[selector] {
                selector += 1;
            }
            count = VALUES_PER_WORD[selector];
            break;
        }
        trial = value;
    }

    Ok((selector, count))
}

fn encode_raw(values: &[i64]) -> Vec<u8> {
    let mut buf = start_buffer(EncodingType::RawInt64, values.len(), values.len() * 8);
    for &value in values {
        buf.put_i64(value);
    }
    buf
}

fn decode_raw(reader: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<i64>> {
    let mut values = Vec::with_capacity(count.min(remaining(reader) / 8));
    for _ in 0..count {
        let value = reader
            .read_i64::<BigEndian>()
            .map_err(|e| CodecError::short_read(e, count, values.len()))?;
        values.push(value);
    }
    Ok(values)
}

fn decode_packed(reader: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<i64>> {
    let mut values = Vec::with_capacity(count.min(remaining(reader) / 8 * VALUES_PER_WORD[0]));
    let mut prev = 0i64;

    while values.len() < count {
        let word = reader
            .read_u64::<BigEndian>()
            .map_err(|e| CodecError::short_read(e, count, values.len()))?;
        let selector = (word & SELECTOR_MASK) as usize;
        let bits = BITS_PER_VALUE[selector];
        let mask = field_mask(bits);

        for k in 0..VALUES_PER_WORD[selector] {
            let zigzag = (word >> (SELECTOR_BITS + bits * k as u32)) & mask;
            prev = prev.wrapping_add(zigzag_decode(zigzag));
            values.push(prev);
            if values.len() == count {
                break;
            }
        }
    }

    Ok(values)
}

fn remaining(reader: &Cursor<&[u8]>) -> usize {
    let len = reader.get_ref().len();
    len.saturating_sub(reader.position() as usize)
}
