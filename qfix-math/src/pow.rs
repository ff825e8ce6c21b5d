//! Real power `a^b` as `exp(b · ln a)`.

use std::cmp::Ordering;

use crate::constants::{is_inf, EXP_INPUT_EXPONENT, INF, MSB, NAN, POW_EXPONENT_B};
use crate::exponential::exp;
use crate::logarithm::log;
use crate::shift::shift_round;

/// Fraction bits of `b` at [`POW_EXPONENT_B`].
const B_FRACTION_MASK: i32 = (1 << (MSB - POW_EXPONENT_B)) - 1;

/// Lowest integer bit of `b` at [`POW_EXPONENT_B`].
const B_UNIT_BIT: i32 = 1 << (MSB - POW_EXPONENT_B);

/// Compare a positive mantissa at `exponent` with 1.0.
fn compare_to_one(m: i32, exponent: i32) -> Ordering {
    let shift = MSB - exponent;
    if shift < 0 {
        // 1.0 would sit below the least significant bit
        Ordering::Greater
    } else if shift > MSB {
        Ordering::Less
    } else {
        m.cmp(&(1 << shift))
    }
}

fn is_integer(b: i32) -> bool {
    b & B_FRACTION_MASK == 0
}

fn is_odd(b: i32) -> bool {
    is_integer(b) && b & B_UNIT_BIT != 0
}

/// `a^b` at `exponent_result`, where `b` is always at [`POW_EXPONENT_B`].
///
/// Special cases are checked in order:
///
/// | operands | result |
/// |---|---|
/// | `a == 1` or `b == 0` | 1 |
/// | either `NAN` | `NAN` |
/// | `a == 0` | `0` for `b > 0`, `INF` otherwise |
/// | `a == ±INF` | `0` for `b < 0`, `-INF` for `a < 0` with odd integer `b`, else `INF` |
/// | `b == ±INF` | by `|a|` against 1 |
/// | `a < 0`, `b` not an integer | `NAN` |
/// | `a < 0`, `b` an integer | `±|a|^b`, negative for odd `b` |
///
/// ```
/// use qfix_math::pow;
///
/// // 2.0 at exponent 2 raised to 3.0, result at exponent 5
/// let r = pow(1 << 29, 3 << 15, 2, 5);
/// assert!((f64::from(r) / f64::from(1 << 25) - 8.0).abs() < 1e-2);
/// ```
pub fn pow(a: i32, b: i32, exponent_a: i32, exponent_result: i32) -> i32 {
    let unit = || exp(0, exponent_result);

    if b == 0 || (a > 0 && compare_to_one(a, exponent_a) == Ordering::Equal) {
        return unit();
    }
    if a == NAN || b == NAN {
        return NAN;
    }
    if a == 0 {
        return if b > 0 { 0 } else { INF };
    }
    if is_inf(a) {
        if b < 0 {
            return 0;
        }
        return if a < 0 && is_odd(b) { -INF } else { INF };
    }
    if is_inf(b) {
        return match compare_to_one(a.abs(), exponent_a) {
            Ordering::Greater => {
                if b > 0 {
                    INF
                } else {
                    0
                }
            }
            Ordering::Less => {
                if b > 0 {
                    0
                } else {
                    INF
                }
            }
            Ordering::Equal => unit(),
        };
    }

    let mut negate = false;
    let mut base = a;
    if a < 0 {
        if !is_integer(b) {
            log::trace!("pow: negative base with fractional power {}", b);
            return NAN;
        }
        base = -a;
        negate = is_odd(b);
    }

    // ln(base) at the exp operand exponent; b·ln(base) lands there after dropping b's
    // fraction bits.
    let ln = log(base, exponent_a, EXP_INPUT_EXPONENT);
    let product = shift_round(i64::from(b) * i64::from(ln), POW_EXPONENT_B - MSB);
    let result = if product > i64::from(INF) {
        INF
    } else if product < -i64::from(INF) {
        0
    } else {
        exp(product as i32, exponent_result)
    };

    if negate {
        -result
    } else {
        result
    }
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
    fn test_pow_general() {
        let cases = [(2.0, 3.0), (2.0, 0.5), (9.0, 0.5), (1.5, 2.5), (0.5, -2.0), (10.0, -1.5)];
        for &(x, y) in &cases {
            let got = decode(pow(encode(x, 5), encode(y, 15), 5, 10), 10);
            let want = x.powf(y);
            assert!((got - want).abs() / want < 1e-3, "{}^{} = {} vs {}", x, y, got, want);
        }
    }

    #[test]
    fn test_pow_negative_base() {
        let got = decode(pow(encode(-2.0, 5), encode(3.0, 15), 5, 10), 10);
        assert!((got + 8.0).abs() < 1e-2, "got {}", got);
        let got = decode(pow(encode(-2.0, 5), encode(2.0, 15), 5, 10), 10);
        assert!((got - 4.0).abs() < 1e-2, "got {}", got);
        assert_eq!(pow(encode(-2.0, 5), encode(0.5, 15), 5, 10), NAN);
    }

    #[test]
    fn test_pow_unit_cases() {
        assert_eq!(pow(12345, 0, 7, 3), 1 << 27);
        assert_eq!(pow(NAN, 0, 7, 3), 1 << 27);
        assert_eq!(pow(1 << 23, encode(17.5, 15), 7, 3), 1 << 27);
        assert_eq!(pow(1 << 23, INF, 7, 3), 1 << 27);
    }

    #[test]
    fn test_pow_zero_and_infinite_base() {
        assert_eq!(pow(0, 1 << 15, 5, 5), 0);
        assert_eq!(pow(0, -(1 << 15), 5, 5), INF);
        assert_eq!(pow(INF, -(1 << 15), 5, 5), 0);
        assert_eq!(pow(INF, 1 << 15, 5, 5), INF);
        assert_eq!(pow(-INF, 3 << 15, 5, 5), -INF);
        assert_eq!(pow(-INF, 2 << 15, 5, 5), INF);
        assert_eq!(pow(-INF, 1 << 14, 5, 5), INF);
    }

    #[test]
    fn test_pow_infinite_power() {
        let big = encode(3.0, 5);
        let small = encode(0.25, 5);
        assert_eq!(pow(big, INF, 5, 5), INF);
        assert_eq!(pow(big, -INF, 5, 5), 0);
        assert_eq!(pow(small, INF, 5, 5), 0);
        assert_eq!(pow(small, -INF, 5, 5), INF);
        assert_eq!(pow(-big, INF, 5, 5), INF);
    }

    #[test]
    fn test_pow_nan() {
        assert_eq!(pow(NAN, 1 << 15, 5, 5), NAN);
        assert_eq!(pow(1 << 20, NAN, 5, 5), NAN);
    }

    #[test]
    fn test_pow_saturates() {
        // 10^20 at exponent 10
        assert_eq!(pow(encode(10.0, 5), encode(20.0, 15), 5, 10), INF);
        // 10^-20 at exponent 10
        assert_eq!(pow(encode(10.0, 5), encode(-20.0, 15), 5, 10), 0);
    }
}
