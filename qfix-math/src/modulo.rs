//! Remainder of two fixed-point magnitudes.

use crate::constants::{is_inf, NAN};

/// Bit 30: an operand with this bit set cannot be up-shifted any further.
const TOP_BIT: i32 = 1 << 30;

/// `|a| mod |b|`, always non-negative.
///
/// The result is at exponent `min(exponent_a, exponent_b)`. Signs are discarded on
/// purpose: trig range reduction depends on the remainder being a magnitude.
///
/// - `a == 0` → `0`
/// - `b == 0` → `NAN`
/// - `a == ±INF` or either operand `NAN` → `NAN`
///
/// ```
/// use qfix_math::modulo;
///
/// // 5.5 mod 2.0 == 1.5: a at exponent 3, b at exponent 2, result at exponent 2
/// let r = modulo(738_197_504, 1 << 29, 3, 2);
/// assert_eq!(r, 3 << 27);
/// ```
pub fn modulo(a: i32, b: i32, exponent_a: i32, exponent_b: i32) -> i32 {
    if a == NAN || b == NAN {
        return NAN;
    }
    if a == 0 {
        return 0;
    }
    if b == 0 {
        log::trace!("modulo: zero divisor");
        return NAN;
    }
    if is_inf(a) {
        log::trace!("modulo: infinite dividend");
        return NAN;
    }

    let mut a = a.abs();
    let mut b = b.abs();
    let mut exponent_a = exponent_a;
    let mut exponent_b = exponent_b;

    // Bring b down to a's exponent as far as its headroom allows.
    while exponent_b > exponent_a && b & TOP_BIT == 0 {
        b <<= 1;
        exponent_b -= 1;
    }
    if exponent_b > exponent_a {
        // b is still strictly larger than a
        return a;
    }
    if a == b {
        return 0;
    }

    loop {
        while exponent_a > exponent_b && a & TOP_BIT == 0 {
            a <<= 1;
            exponent_a -= 1;
        }
        if exponent_a == exponent_b {
            if a >= b {
                a %= b;
            }
            break;
        }
        // a fills the word here and still sits above b's exponent, so b read at
        // a's exponent is a multiple of the true divisor.
        if b <= a {
            a %= b;
        } else {
            // 2a > b because a has its top bit set
            a = ((a as u32) << 1).wrapping_sub(b as u32) as i32;
            exponent_a -= 1;
        }
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_remainder() {
        assert_eq!(modulo(7, 3, 30, 30), 1);
        assert_eq!(modulo(-7, 3, 30, 30), 1);
        assert_eq!(modulo(7, -3, 30, 30), 1);
        assert_eq!(modulo(6, 3, 30, 30), 0);
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(modulo(5, 0, 30, 30), NAN);
        assert_eq!(modulo(0, 0, 30, 30), 0);
        assert_eq!(modulo(NAN, 3, 30, 30), NAN);
        assert_eq!(modulo(crate::constants::INF, 3, 30, 30), NAN);
    }

    #[test]
    fn test_divisor_larger_than_dividend() {
        // 0.25 mod 3.0 at exponents (0, 2): answer is a at exponent 0
        assert_eq!(modulo(1 << 28, 3 << 28, 0, 2), 1 << 28);
    }

    #[test]
    fn test_lower_exponent_divisor_is_aligned() {
        // 1.5 mod 1.0 with b at a higher exponent: result at exponent 1
        let a = 3 << 28; // 1.5 at exponent 1
        let b = 1 << 26; // 1.0 at exponent 4
        assert_eq!(modulo(a, b, 1, 4), 1 << 28);
    }

    #[test]
    fn test_equal_after_alignment() {
        // 4.0 mod 2.0 where a needs up-shifting before it meets b
        let a = 1 << 28; // 4.0 at exponent 4
        let b = 1 << 29; // 2.0 at exponent 2
        assert_eq!(modulo(a, b, 4, 2), 0);
    }

    #[test]
    fn test_small_divisor_far_below() {
        // 1000.0 mod 0.75, with a at exponent 10 and b at exponent 0
        let a = 1000 << 20;
        let b = 3 << 28;
        let r = modulo(a, b, 10, 0);
        let expected = 1000.0f64 % 0.75;
        let got = f64::from(r) * 2f64.powi(-30);
        assert!((got - expected).abs() < 1e-9, "{} vs {}", got, expected);
    }
}
