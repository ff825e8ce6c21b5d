//! Base-2 and natural logarithms.

use crate::constants::{HALF_MSB, INF, LOG2E, MSB, NAN};
use crate::shift::{multiply_round, saturate, saturate_shift_truncate};

/// Cap on fraction bits extracted by squaring. Anything past this is below the
/// precision of the normalized operand; the rest of the scale is a plain up-shift.
const MAX_FRACTION_BITS: i32 = 48;

/// log₂(a) at `exponent_result`.
///
/// - `a < 0` (including `NAN`) → `NAN`
/// - `a == 0` → `-INF`
/// - `a == INF` → `INF`
///
/// ```
/// use qfix_math::log2;
///
/// // log2(8) with 8 as a plain integer (exponent 30), result at exponent 15
/// assert_eq!(log2(8, 30, 15), 3 << 15);
/// // log2(0.25) with 0.25 at exponent 0
/// assert_eq!(log2(1 << 28, 0, 15), -2 << 15);
/// ```
pub fn log2(a: i32, exponent_a: i32, exponent_result: i32) -> i32 {
    if a < 0 {
        log::trace!("log2: negative operand {}", a);
        return NAN;
    }
    if a == 0 {
        return -INF;
    }
    if a == INF {
        return INF;
    }

    let mut a = a;
    let mut exponent_a = exponent_a;

    // For a < 1 the answer is -log2(1/a).
    let negate = exponent_a < 0 || (exponent_a < MSB && a < 1 << (MSB - exponent_a));
    if negate {
        // Keep only about half a word of significant bits, so the inverse still
        // carries the other half.
        while a & 0x7FFF_0000 != 0 {
            a >>= 1;
            exponent_a += 1;
        }
        // 1 at bit MSB divided by a puts the inverse at exponent MSB - exponent_a
        a = (1 << MSB) / a;
        exponent_a = MSB - exponent_a;
    }

    // Normal form: operand = (a / one) * 2^(exponent_a - exponent_work), with
    // a / one in [1, 2). The power of two becomes the integer part of the result.
    let mut exponent_work = HALF_MSB;
    let mut one = 1i32 << (MSB - exponent_work);
    while a < one {
        one >>= 1;
        exponent_work += 1;
    }
    let mut result = i64::from(exponent_a - exponent_work); // pure integer for now
    let two = one << 1;
    while a >= two {
        result += 1;
        a = (a >> 1) + (a & 1);
    }

    // One fraction bit per squaring: if (a/one)^2 >= 2 the next bit is set.
    let mut shift = MSB - exponent_result;
    if a > one {
        let square_shift = exponent_work - MSB;
        let fraction_bits = shift.clamp(0, MAX_FRACTION_BITS);
        for _ in 0..fraction_bits {
            a = multiply_round(a, a, square_shift);
            result <<= 1;
            if a >= two {
                result |= 1;
                a = (a >> 1) + (a & 1);
            }
        }
        shift -= fraction_bits;
        // one more squaring decides rounding of the last bit
        a = multiply_round(a, a, square_shift);
        if a >= two {
            result += 1;
        }
    }

    // result is non-negative here, so truncation rounds toward zero before the sign
    let result = saturate_shift_truncate(result, shift);
    if negate {
        -result
    } else {
        result
    }
}

/// ln(a) at `exponent_result`, via `log2(a) / log2(e)`.
///
/// Sentinels from [`log2`] pass through unchanged.
pub fn log(a: i32, exponent_a: i32, exponent_result: i32) -> i32 {
    let l = log2(a, exponent_a, exponent_result);
    if l == NAN || l == INF || l == -INF {
        return l;
    }
    // LOG2E sits at exponent 0, so pre-shifting by MSB keeps exponent_result.
    saturate((i64::from(l) << MSB) / i64::from(LOG2E))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(mantissa: i32, exponent: i32) -> f64 {
        f64::from(mantissa) * 2f64.powi(exponent - MSB)
    }

    fn encode(value: f64, exponent: i32) -> i32 {
        (value * 2f64.powi(MSB - exponent)).round() as i32
    }

    #[test]
    fn test_log2_powers_of_two() {
        assert_eq!(log2(8, 30, 15), 3 << 15);
        assert_eq!(log2(1, 30, 15), 0);
        assert_eq!(log2(1 << 30, 0, 15), 0);
        assert_eq!(log2(1 << 28, 0, 15), -2 << 15);
        assert_eq!(log2(1 << 20, 30, 20), 20 << 10);
    }

    #[test]
    fn test_log2_general() {
        for &x in &[0.3, 0.5001, 1.7, 3.0, 10.0, 100.5, 1000.0] {
            let got = decode(log2(encode(x, 11), 11, 5), 5);
            let want = x.log2();
            assert!((got - want).abs() < 2e-4, "log2({}) = {} vs {}", x, got, want);
        }
    }

    #[test]
    fn test_log_general() {
        for &x in &[0.01, 0.5, 1.0, 2.0, std::f64::consts::E, 7.0, 150.0] {
            let got = decode(log(encode(x, 9), 9, 4), 4);
            let want = x.ln();
            assert!((got - want).abs() < 2e-4, "ln({}) = {} vs {}", x, got, want);
        }
    }

    #[test]
    fn test_log_domain() {
        assert_eq!(log2(-1, 30, 15), NAN);
        assert_eq!(log2(NAN, 30, 15), NAN);
        assert_eq!(log2(0, 30, 15), -INF);
        assert_eq!(log(-5, 10, 10), NAN);
        assert_eq!(log(0, 10, 10), -INF);
        assert_eq!(log(INF, 10, 10), INF);
    }

    #[test]
    fn test_log2_saturates_at_tight_exponent() {
        // log2(2^20) = 20 does not fit at exponent 3 (range below 16)
        assert_eq!(log2(1 << 20, 30, 3), INF);
    }
}
