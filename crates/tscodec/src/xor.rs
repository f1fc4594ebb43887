//! XOR-delta codec for `f64` columns.
//!
//! Each value is XORed with the bit pattern of the value before it. Slowly
//! changing samples produce deltas with long runs of zero bits at one end,
//! so only the significant bytes are kept. A 4-bit flag per value records
//! how many bytes were kept (`flag & 7`, stored minus one) and which end was
//! dropped (`flag & 8` set means trailing zero bytes were dropped).
//!
//! Flags are shared between consecutive pairs of values:
//!
//! ```text
//! [flag(2k) | flag(2k+1) << 4] [bytes of 2k] [bytes of 2k+1] ...
//! ```
//!
//! An odd-length column ends with a flag byte whose high nibble is zero,
//! the last value's bytes, and a single zero pad byte.

use std::io::{self, Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};
use bytes::BufMut;

use crate::error::{CodecError, Result};
use crate::format::{start_buffer, EncodingType, Header};

/// Flag bit set when the delta was truncated from the low end.
const TRAILING: u8 = 0b1000;
const LEN_MASK: u8 = 0b0111;

/// A value's XOR delta together with its truncation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct XorDelta {
    diff: u64,
    flag: u8,
}

impl XorDelta {
    fn new(diff: u64) -> Self {
        let leading = diff.leading_zeros();
        let trailing = diff.trailing_zeros();
        let (dropped, direction) = if trailing > leading {
            (trailing, TRAILING)
        } else {
            (leading, 0)
        };
        let n_bytes = (8 - dropped / 8).clamp(1, 8);
        Self {
            diff,
            flag: direction | (n_bytes - 1) as u8,
        }
    }

    /// Number of body bytes this delta occupies.
    fn len(self) -> usize {
        byte_len(self.flag)
    }

    fn write_to<B: BufMut>(self, buf: &mut B) {
        let n_bytes = self.len();
        let mut v = self.diff >> shift_for(self.flag);
        for _ in 0..n_bytes {
            buf.put_u8(v as u8);
            v >>= 8;
        }
    }
}

fn byte_len(flag: u8) -> usize {
    (flag & LEN_MASK) as usize + 1
}

fn shift_for(flag: u8) -> usize {
    if flag & TRAILING != 0 {
        64 - byte_len(flag) * 8
    } else {
        0
    }
}

/// Holds the first delta of a pair until its partner arrives.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum PendingPair {
    #[default]
    Empty,
    One(XorDelta),
}

impl PendingPair {
    /// Adds a delta, returning the completed pair when both slots are full.
    fn push(&mut self, delta: XorDelta) -> Option<(XorDelta, XorDelta)> {
        match std::mem::take(self) {
            Self::Empty => {
                *self = Self::One(delta);
                None
            }
            Self::One(first) => Some((first, delta)),
        }
    }

    /// Removes an unpaired delta left over at the end of the column.
    fn take(&mut self) -> Option<XorDelta> {
        match std::mem::take(self) {
            Self::Empty => None,
            Self::One(delta) => Some(delta),
        }
    }
}

/// Output would outgrow the raw byte budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ByteBudgetExceeded {
    index: usize,
}

/// Compresses `values`, falling back to raw storage when XOR deltas do not help.
///
/// # Panics
///
/// Panics if `values` holds more than `u32::MAX` elements.
pub fn compress_float64(values: &[f64]) -> Vec<u8> {
    match encode_xor(values) {
        Ok(buf) => {
            tracing::trace!(count = values.len(), bytes = buf.len(), "xor float64 column");
            buf
        }
        Err(ByteBudgetExceeded { index }) => {
            tracing::debug!(
                count = values.len(),
                index,
                "xor deltas exceed byte budget, falling back to raw float64 encoding"
            );
            encode_raw(values)
        }
    }
}

/// Decodes a buffer produced by [`compress_float64`].
pub fn decompress_float64(data: &[u8]) -> Result<Vec<f64>> {
    let mut reader = Cursor::new(data);
    let header = Header::read_from(&mut reader)?;
    match header.encoding {
        EncodingType::RawFloat64 => decode_raw(&mut reader, header.len()),
        EncodingType::XorFloat64 => decode_xor(&mut reader, header.len()),
        found => Err(CodecError::EncodingMismatch {
            expected: "float64",
            found,
        }),
    }
}

fn encode_xor(values: &[f64]) -> std::result::Result<Vec<u8>, ByteBudgetExceeded> {
    let byte_limit = 8 * values.len() + 1;
    let mut buf = start_buffer(EncodingType::XorFloat64, values.len(), values.len() * 4);
    let mut prev_bits = 0u64;
    let mut pending = PendingPair::default();

    for (index, &value) in values.iter().enumerate() {
        let bits = value.to_bits();
        if let Some((first, second)) = pending.push(XorDelta::new(bits ^ prev_bits)) {
            if buf.len() + 1 + first.len() + second.len() > byte_limit {
                return Err(ByteBudgetExceeded { index });
            }
            buf.put_u8(first.flag | (second.flag << 4));
            first.write_to(&mut buf);
            second.write_to(&mut buf);
        }
        prev_bits = bits;
    }

    if let Some(last) = pending.take() {
        if buf.len() + 1 + last.len() + 1 > byte_limit {
            return Err(ByteBudgetExceeded {
                index: values.len() - 1,
            });
        }
        buf.put_u8(last.flag);
        last.write_to(&mut buf);
        // pad keeps the stream pair-aligned; never decoded as a value
        buf.put_u8(0);
    }

    Ok(buf)
}

fn encode_raw(values: &[f64]) -> Vec<u8> {
    let mut buf = start_buffer(EncodingType::RawFloat64, values.len(), values.len() * 8);
    for &value in values {
        buf.put_f64(value);
    }
    buf
}

fn decode_raw(reader: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(count.min(remaining(reader) / 8));
    for _ in 0..count {
        let value = reader
            .read_f64::<BigEndian>()
            .map_err(|e| CodecError::short_read(e, count, values.len()))?;
        values.push(value);
    }
    Ok(values)
}

fn decode_xor(reader: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(count.min(remaining(reader)));
    let mut prev_bits = 0u64;
    let mut flags = 0u8;

    for index in 0..count {
        let flag = if index % 2 == 0 {
            flags = reader
                .read_u8()
                .map_err(|e| CodecError::short_read(e, count, values.len()))?;
            flags & 0x0F
        } else {
            flags >> 4
        };
        let diff =
            read_diff(reader, flag).map_err(|e| CodecError::short_read(e, count, values.len()))?;
        prev_bits ^= diff;
        values.push(f64::from_bits(prev_bits));
    }

    Ok(values)
}

/// Reads one truncated delta (little-endian bytes) and restores its position.
fn read_diff(reader: &mut Cursor<&[u8]>, flag: u8) -> io::Result<u64> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes[..byte_len(flag)])?;
    Ok(u64::from_le_bytes(bytes) << shift_for(flag))
}

fn remaining(reader: &Cursor<&[u8]>) -> usize {
    let len = reader.get_ref().len();
    len.saturating_sub(reader.position() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{peek_header, HEADER_LEN};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_bit_exact(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_eq!(a.to_bits(), e.to_bits(), "{a} != {e}");
        }
    }

    #[test]
    fn test_delta_flags() {
        let zero = XorDelta::new(0);
        assert_eq!(zero.flag, 0);
        assert_eq!(zero.len(), 1);

        let full = XorDelta::new(u64::MAX);
        assert_eq!(full.flag, 7);
        assert_eq!(full.len(), 8);

        let high = XorDelta::new(0xFF00_0000_0000_0000);
        assert_eq!(high.flag, TRAILING);
        assert_eq!(high.len(), 1);

        let low = XorDelta::new(0x1);
        assert_eq!(low.flag, 0);

        // 1.0 against zero keeps the two high bytes
        let one = XorDelta::new(1.0f64.to_bits());
        assert_eq!(one.flag, TRAILING | 1);
    }

    #[test]
    fn test_delta_bytes_restore() {
        for diff in [0u64, 1, 0x3FF0_0000_0000_0000, 0x0000_1234_5600_0000, u64::MAX] {
            let delta = XorDelta::new(diff);
            let mut buf = Vec::new();
            delta.write_to(&mut buf);
            assert_eq!(buf.len(), delta.len());
            let restored = read_diff(&mut Cursor::new(&buf[..]), delta.flag).unwrap();
            assert_eq!(restored, diff);
        }
    }

    #[test]
    fn test_pending_pair_state_machine() {
        let a = XorDelta::new(1);
        let b = XorDelta::new(2);
        let mut pending = PendingPair::default();

        assert_eq!(pending.take(), None);
        assert_eq!(pending.push(a), None);
        assert_eq!(pending, PendingPair::One(a));
        assert_eq!(pending.push(b), Some((a, b)));
        assert_eq!(pending, PendingPair::Empty);

        assert_eq!(pending.push(b), None);
        assert_eq!(pending.take(), Some(b));
        assert_eq!(pending, PendingPair::Empty);
    }

    #[test]
    fn test_repeated_value_with_outlier() {
        let mut values = vec![12.21212; 23];
        values.push(10_000_000.123);

        let compressed = compress_float64(&values);
        assert_eq!(peek_header(&compressed).unwrap().encoding, EncodingType::XorFloat64);
        assert!(compressed.len() < encode_raw(&values).len());
        assert_bit_exact(&decompress_float64(&compressed).unwrap(), &values);
    }

    #[test]
    fn test_odd_length_layout() {
        let values = [1.0, 1.0, 1.0];
        let compressed = compress_float64(&values);

        assert_eq!(
            compressed,
            vec![3, 0, 0, 0, 3, 0x09, 0xF0, 0x3F, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(decompress_float64(&compressed).unwrap(), values);
    }

    #[test]
    fn test_single_value() {
        let compressed = compress_float64(&[0.0]);
        assert_eq!(compressed, vec![3, 0, 0, 0, 1, 0x00, 0x00, 0x00]);
        assert_bit_exact(&decompress_float64(&compressed).unwrap(), &[0.0]);
    }

    #[test]
    fn test_special_values_round_trip() {
        let nan_payload = f64::from_bits(0x7FF8_0000_DEAD_BEEF);
        let values = [
            -0.0,
            0.0,
            f64::NAN,
            nan_payload,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::MIN_POSITIVE / 4.0,
            f64::MAX,
            f64::MIN,
        ];
        let compressed = compress_float64(&values);
        assert_bit_exact(&decompress_float64(&compressed).unwrap(), &values);
    }

    #[test]
    fn test_full_width_deltas_fall_back_to_raw() {
        // every delta has its top and bottom bit set, so nothing can be dropped
        let values: Vec<f64> = (0..64)
            .map(|i| f64::from_bits(if i % 2 == 0 { 0x8000_0000_0000_0001 } else { 0 }))
            .collect();

        let compressed = compress_float64(&values);
        assert_eq!(compressed, encode_raw(&values));
        assert_bit_exact(&decompress_float64(&compressed).unwrap(), &values);
    }

    #[test]
    fn test_output_never_exceeds_raw() {
        let mut rng = StdRng::seed_from_u64(3);
        for len in [1usize, 2, 3, 10, 101] {
            let values: Vec<f64> = (0..len).map(|_| rng.r#gen::<f64>() * 1e6).collect();
            let compressed = compress_float64(&values);
            assert!(compressed.len() <= HEADER_LEN + 8 * len);
            assert_bit_exact(&decompress_float64(&compressed).unwrap(), &values);
        }
    }

    #[test]
    fn test_random_clustered_columns() {
        let mut rng = StdRng::seed_from_u64(11);
        for base in [1.12213, 100.242, 10000.23354, 1000000.098343, 10000000.23254] {
            for range in [1i64, 10, 1000, 100_000, 1_000_000] {
                let values: Vec<f64> = (0..101)
                    .map(|_| base + rng.gen_range(0..range) as f64)
                    .collect();
                let compressed = compress_float64(&values);
                assert_bit_exact(&decompress_float64(&compressed).unwrap(), &values);
            }
        }
    }

    #[test]
    fn test_empty_column() {
        let compressed = compress_float64(&[]);
        assert_eq!(compressed.len(), HEADER_LEN);
        assert!(decompress_float64(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_xor_stream() {
        let values: Vec<f64> = (0..20).map(|i| 20.5 + f64::from(i) * 0.25).collect();
        let compressed = compress_float64(&values);
        assert_eq!(peek_header(&compressed).unwrap().encoding, EncodingType::XorFloat64);

        for cut in HEADER_LEN..compressed.len() {
            let err = decompress_float64(&compressed[..cut]).unwrap_err();
            assert!(err.is_truncation(), "cut at {cut}: {err}");
        }
    }

    #[test]
    fn test_truncated_raw_stream() {
        let compressed = encode_raw(&[1.5, 2.5]);
        let err = decompress_float64(&compressed[..compressed.len() - 1]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Truncated {
                expected: 2,
                decoded: 1
            }
        ));
    }

    #[test]
    fn test_rejects_int_buffer() {
        let compressed = crate::simple8b::compress_int64(&[1, 2, 3]);
        let err = decompress_float64(&compressed).unwrap_err();
        assert!(matches!(
            err,
            CodecError::EncodingMismatch {
                expected: "float64",
                found: EncodingType::PackedInt64
            }
        ));
    }
}
