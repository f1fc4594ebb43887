//! Integer helpers shared by the codecs.

/// Returns true if `a + b` stays inside the `i64` range.
#[inline]
#[must_use]
pub fn safe_add(a: i64, b: i64) -> bool {
    (a >= 0 && b <= i64::MAX - a) || (a < 0 && b >= i64::MIN - a)
}

/// Returns `curr - prev`, or `None` if the subtraction overflows `i64`.
#[inline]
#[must_use]
pub fn checked_delta(curr: i64, prev: i64) -> Option<i64> {
    if prev == i64::MIN {
        // -prev is not representable; the difference fits only for negative curr
        return (curr < 0).then(|| curr - i64::MIN);
    }
    safe_add(curr, -prev).then(|| curr - prev)
}

/// Maps a signed value onto an unsigned one so small magnitudes stay small.
///
/// `0 -> 0`, `-1 -> 1`, `1 -> 2`, `-2 -> 3`, ...
#[inline]
#[must_use]
pub fn zigzag_encode(v: i64) -> u64 {
    ((v >> 63) ^ (v << 1)) as u64
}

/// Inverse of [`zigzag_encode`].
#[inline]
#[must_use]
pub fn zigzag_decode(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}
