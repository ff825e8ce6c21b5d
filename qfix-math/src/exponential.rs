//! Natural exponential.

use crate::constants::{E, EXP_INPUT_EXPONENT, E_EXPONENT, INF, MSB, NAN};
use crate::shift::{saturate_shift_round, shift_round};

/// Maximum index of the last series term.
const EXP_TERMS: u64 = 30;

/// `e^a` at `exponent_result`. The operand is always at exponent [`EXP_INPUT_EXPONENT`].
///
/// Saturates to `INF` on overflow and to `0` on underflow.
///
/// ```
/// use qfix_math::{exp, E};
///
/// assert_eq!(exp(0, 10), 1 << 20);
/// assert_eq!(exp(1 << 23, 1), E); // e^1, exactly the table value
/// ```
pub fn exp(a: i32, exponent_result: i32) -> i32 {
    if a == NAN {
        return NAN;
    }
    if a == INF {
        return INF;
    }
    if a == -INF {
        return 0;
    }

    if a == 0 {
        let shift = MSB - exponent_result;
        if shift < 0 {
            return 0;
        }
        if shift > MSB {
            log::trace!("exp: 1 does not fit at exponent {}", exponent_result);
            return INF;
        }
        return 1 << shift;
    }

    let one = 1u64 << (MSB - EXP_INPUT_EXPONENT);
    if i64::from(a) == one as i64 {
        let shift = E_EXPONENT - exponent_result;
        if shift > 0 {
            // E already uses every bit
            return INF;
        }
        return shift_round(i64::from(E), shift) as i32;
    }

    // e^a = sum a^k / k!, with term_k = term_(k-1) * a / k.
    // Positive terms converge faster, so e^-a is computed as 1 / e^a.
    let negate = a < 0;
    let x = u64::from(a.unsigned_abs());

    // term and result share exponent_work while a stays at EXP_INPUT_EXPONENT.
    // term * a has exponent_work + EXP_INPUT_EXPONENT - MSB at bit MSB, so a
    // down-shift of MSB - EXP_INPUT_EXPONENT lands back on exponent_work.
    let shift = (MSB - EXP_INPUT_EXPONENT) as u32;
    let round = 1u64 << (shift - 1);
    let maximum = 1u64 << MSB;

    let mut result = one + x;
    let mut exponent_work = EXP_INPUT_EXPONENT;
    let mut term = x;
    for i in 2..EXP_TERMS {
        let mut next = (term * x / i + round) >> shift;
        if next == 0 {
            break;
        }
        while next >= maximum || result >= maximum {
            next >>= 1;
            result = (result + 1) >> 1;
            exponent_work += 1;
        }
        term = next;
        result += term;
    }

    if negate {
        // 1 at bit 2*MSB has exponent 0, so the quotient sits at exponent -exponent_work
        let inverse = (1u64 << (2 * MSB)) / result;
        saturate_shift_round(inverse as i64, -exponent_work - exponent_result)
    } else {
        saturate_shift_round(result as i64, exponent_work - exponent_result)
    }
}
