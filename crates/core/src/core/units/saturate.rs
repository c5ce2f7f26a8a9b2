//! Fixed-point narrowing and saturation helpers shared by the datapaths.

use crate::common::Word;
use crate::config::Precision;

/// Sign-extends the low precision-width bits of an architectural word,
/// widening into the 64-bit accumulator domain.
#[inline]
pub fn narrow(value: Word, precision: Precision) -> i64 {
    let shift = 64 - precision.bits();
    ((value as i64) << shift) >> shift
}

/// Clamps an accumulator value to the signed range of the precision mode.
///
/// Returns the clamped word and whether clamping occurred (a saturation
/// event: recorded, never fatal).
#[inline]
pub fn clamp(value: i64, precision: Precision) -> (Word, bool) {
    let (min, max) = (precision.min(), precision.max());
    if value > max {
        (max as Word, true)
    } else if value < min {
        (min as Word, true)
    } else {
        (value as Word, false)
    }
}

/// Wraps an accumulator value into the precision width (two's complement).
#[inline]
pub fn wrap(value: i64, precision: Precision) -> Word {
    let shift = 64 - precision.bits();
    ((value << shift) >> shift) as Word
}
