//! Sine, cosine and tangent.
//!
//! `sin` and `cos` answer at [`SIN_RESULT_EXPONENT`] regardless of the operand
//! exponent, so their results lie in `[-2^29, 2^29]` (give or take rounding).

use crate::constants::{is_inf, is_nan, INF, MSB, NAN, PI, PI_EXPONENT, SIN_RESULT_EXPONENT};
use crate::modulo::modulo;
use crate::shift::{saturate_shift_round, shift_round};

/// Maximum number of Taylor terms (including the first).
const SIN_TERMS: i64 = 7;

/// π with exponent 2 rather than 1.
const PI_AT_2: i32 = PI >> 1;

/// 1.0 at exponent 1.
const ONE_AT_1: i32 = 1 << (MSB - SIN_RESULT_EXPONENT);

/// Sine of `a` (at `exponent_a`). Result exponent is always 1.
pub fn sin(a: i32, exponent_a: i32) -> i32 {
    if is_nan(a) || is_inf(a) {
        return NAN;
    }

    // sin is odd, and the remainder below only sees magnitudes
    let mut negate = a < 0;

    // Reading π at exponent 2 gives 2π. The remainder lands at min(exponent_a, 2).
    let reduced = modulo(a.abs(), PI, exponent_a, PI_EXPONENT + 1);
    let mut x = if exponent_a < 2 {
        shift_round(i64::from(reduced), exponent_a - 2) as i32
    } else {
        reduced
    };

    // Fold [0, 2π) into [0, π/2].
    if x > PI_AT_2 {
        x -= PI_AT_2;
        negate = !negate;
    }
    if x > PI_AT_2 >> 1 {
        x = PI_AT_2 - x;
    }
    let x = i64::from(x << 1); // exponent 1 from here on

    // x - x^3/3! + x^5/5! - ...
    // Each product of two exponent-1 values needs a down-shift of MSB - 1.
    let mut term = x;
    let mut result = x;
    let mut n = 1;
    for _ in 1..SIN_TERMS {
        let n1 = n + 1;
        let n2 = n + 2;
        n = n2;
        term = shift_round(-term * x / n1, 1 - MSB);
        term = shift_round(term * x / n2, 1 - MSB);
        if term == 0 {
            break;
        }
        result += term;
    }

    let result = result as i32;
    if negate {
        -result
    } else {
        result
    }
}

/// Cosine of `a` (at `exponent_a`), computed as `sin(a + π/2)`. Result exponent is 1.
pub fn cos(a: i32, exponent_a: i32) -> i32 {
    if is_nan(a) || is_inf(a) {
        return NAN;
    }

    let (base, exponent) = if exponent_a >= 0 {
        (i64::from(a), exponent_a)
    } else if exponent_a < -MSB {
        // a is too small to move the answer off 1
        return ONE_AT_1;
    } else {
        // too little headroom for π/2 at a negative exponent, so work at exponent 0
        (shift_round(i64::from(a), exponent_a), 0)
    };

    // π's mantissa read at exponent 0 is π/2.
    let half_pi = shift_round(i64::from(PI), -exponent);
    let shifted = base + half_pi;
    if shifted > i64::from(INF) || shifted < -i64::from(INF) {
        sin(shift_round(shifted, -1) as i32, exponent + 1)
    } else {
        sin(shifted as i32, exponent)
    }
}

/// Tangent of `a` (at `exponent_a`), as `sin/cos` at `exponent_result`.
///
/// At the poles, where cosine rounds to exactly zero, the result saturates to `±INF`
/// with the sign of the sine.
pub fn tan(a: i32, exponent_a: i32, exponent_result: i32) -> i32 {
    let s = sin(a, exponent_a);
    let c = cos(a, exponent_a);
    if is_nan(s) || is_nan(c) {
        return NAN;
    }
    if c == 0 {
        log::trace!("tan: pole at mantissa {} exponent {}", a, exponent_a);
        return if s < 0 { -INF } else { INF };
    }

    // Both operands share exponent 1, so the quotient is a plain ratio with its
    // binary point at bit 0. Widen the numerator by 32 bits to keep precision.
    let quotient = (i64::from(s) << 32) / i64::from(c);
    saturate_shift_round(quotient, MSB - exponent_result - 32)
}
