//! Square root by binary restoring digit-by-digit extraction.

use crate::constants::{INF, MSB, NAN};
use crate::shift::saturate_shift_truncate;

/// √a at `exponent_result`, truncating.
///
/// - `a < 0` (including `NAN`) → `NAN`
/// - `a == INF` → `INF`
///
/// ```
/// use qfix_math::sqrt;
///
/// assert_eq!(sqrt(4, 30, 30), 2);
/// assert_eq!(sqrt(1 << 29, 2, 1), 759_250_124); // √2 at exponent 1
/// ```
pub fn sqrt(a: i32, exponent_a: i32, exponent_result: i32) -> i32 {
    if a < 0 {
        log::trace!("sqrt: negative operand {}", a);
        return NAN;
    }
    if a == 0 {
        return 0;
    }
    if a == INF {
        return INF;
    }

    // value = m * 2^power with an even power, so √value = √m * 2^(power / 2)
    let mut m = a as u64;
    let mut power = exponent_a - MSB;
    if power % 2 != 0 {
        m <<= 1;
        power -= 1;
    }
    let mut shift = power / 2 + MSB - exponent_result;

    // highest power of four not above m
    let mut bit: u64 = if m & 0xFFFF_0000 != 0 { 1 << 30 } else { 1 << 16 };
    while bit > m {
        bit >>= 2;
    }

    let mut result: u64 = 0;
    while bit != 0 {
        let trial = result + bit;
        result >>= 1;
        if m >= trial {
            m -= trial;
            result += bit;
        }
        bit >>= 2;
    }

    // m is the remainder now; each step appends one more bit below the point
    while shift > 0 && result <= INF as u64 {
        m <<= 2;
        result <<= 1;
        shift -= 1;
        let trial = (result << 1) + 1;
        if m >= trial {
            m -= trial;
            result += 1;
        }
    }

    saturate_shift_truncate(result as i64, shift)
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
    fn test_sqrt_exact() {
        assert_eq!(sqrt(4, 30, 30), 2);
        assert_eq!(sqrt(9, 30, 28), 3 << 2);
        assert_eq!(sqrt(1 << 29, 2, 1), 759_250_124);
        // 0.25 at exponent 0 gives 0.5 at exponent 0
        assert_eq!(sqrt(1 << 28, 0, 0), 1 << 29);
    }

    #[test]
    fn test_sqrt_truncates() {
        // √8 = 2.83 as an integer
        assert_eq!(sqrt(8, 30, 30), 2);
        assert_eq!(sqrt(15, 30, 30), 3);
    }

    #[test]
    fn test_sqrt_general() {
        for &x in &[0.001, 0.5, 1.0, 2.0, 3.7, 99.0, 1000.0] {
            let a = encode(x, 11);
            let got = decode(sqrt(a, 11, 6), 6);
            let want = decode(a, 11).sqrt();
            // truncation costs at most one unit in the last place (2^-24)
            assert!(got <= want && want - got < 1e-7, "sqrt({}) = {} vs {}", x, got, want);
        }
    }

    #[test]
    fn test_sqrt_sentinels() {
        assert_eq!(sqrt(-1, 30, 30), NAN);
        assert_eq!(sqrt(NAN, 30, 30), NAN);
        assert_eq!(sqrt(INF, 10, 10), INF);
        assert_eq!(sqrt(0, 10, 10), 0);
        // √(2^30) = 2^15 does not fit at exponent 10
        assert_eq!(sqrt(1 << 30, 30, 10), INF);
    }
}
