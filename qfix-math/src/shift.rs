//! Rounding and shifting primitives shared by every kernel.
//!
//! A positive shift moves bits up (multiplies by `2^shift`), a negative shift moves
//! them down. Down-shifts come in two flavors: [`shift_round`] adds half an ULP first
//! (round half up), [`shift_truncate`] drops the bits (floor). Which one a kernel uses
//! is part of its numerical contract.

use crate::constants::INF;

/// `round(a × b × 2^shift)` using a 64-bit intermediate.
///
/// Up-shifts are not range checked: bits above 32 are silently lost. Callers that
/// need saturation use [`saturate_shift_round`] on the product instead.
///
/// ```
/// use qfix_math::multiply_round;
///
/// assert_eq!(multiply_round(3, 5, 0), 15);
/// assert_eq!(multiply_round(3, 5, -1), 8); // 7.5 rounds up
/// assert_eq!(multiply_round(-3, 5, -1), -7); // -7.5 rounds up too
/// assert_eq!(multiply_round(3, 5, 2), 60);
/// ```
#[inline]
pub fn multiply_round(a: i32, b: i32, shift: i32) -> i32 {
    shift_round(i64::from(a) * i64::from(b), shift) as i32
}

/// Shift with round-half-up on the way down.
///
/// Down-shifts of 63 bits or more produce 0; up-shifts of 64 bits or more produce 0.
#[inline]
pub fn shift_round(value: i64, shift: i32) -> i64 {
    if shift < 0 {
        let down = shift.unsigned_abs();
        if down >= 63 {
            return 0;
        }
        value.saturating_add(1 << (down - 1)) >> down
    } else if shift > 0 {
        if shift >= 64 {
            return 0;
        }
        value.wrapping_shl(shift as u32)
    } else {
        value
    }
}

/// Shift that floors on the way down.
#[inline]
pub fn shift_truncate(value: i64, shift: i32) -> i64 {
    if shift < 0 {
        value >> shift.unsigned_abs().min(63)
    } else if shift > 0 {
        if shift >= 64 {
            return 0;
        }
        value.wrapping_shl(shift as u32)
    } else {
        value
    }
}

/// Clamp a wide intermediate into `[-INF, INF]`, so it can never alias `NAN`.
#[inline]
pub fn saturate(value: i64) -> i32 {
    value.clamp(-i64::from(INF), i64::from(INF)) as i32
}

/// Final rescale of a kernel result: [`shift_round`] down, saturating up.
#[inline]
pub fn saturate_shift_round(value: i64, shift: i32) -> i32 {
    if shift > 0 {
        saturate_up(value, shift)
    } else {
        saturate(shift_round(value, shift))
    }
}

/// Final rescale of a kernel result: [`shift_truncate`] down, saturating up.
#[inline]
pub fn saturate_shift_truncate(value: i64, shift: i32) -> i32 {
    if shift > 0 {
        saturate_up(value, shift)
    } else {
        saturate(shift_truncate(value, shift))
    }
}

fn saturate_up(value: i64, shift: i32) -> i32 {
    if value == 0 {
        return 0;
    }
    let limit = if shift >= 63 { 0 } else { i64::from(INF) >> shift };
    if value > limit {
        INF
    } else if value < -limit {
        -INF
    } else {
        (value << shift) as i32
    }
}
