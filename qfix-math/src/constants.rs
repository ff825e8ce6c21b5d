//! Sentinel mantissas and the constant table.
//!
//! Each constant is a mantissa paired with the exponent it is defined at.

/// Most significant usable bit of the mantissa container (one guard bit below the sign).
pub const MSB: i32 = 30;

/// Half of [`MSB`]; the working scale for `log2` normalization.
pub const HALF_MSB: i32 = MSB / 2;

/// Exponents beyond this magnitude are outside the supported calling convention.
pub const MAX_EXPONENT: i32 = 1 << 12;

/// Zero, valid at any exponent.
pub const ZERO: i32 = 0;

/// Positive infinity. Negate for negative infinity.
pub const INF: i32 = i32::MAX;

/// Not a number. Distinct from `-INF`, which is `i32::MIN + 1`.
pub const NAN: i32 = i32::MIN;

/// π at exponent [`PI_EXPONENT`].
pub const PI: i32 = 1_686_629_713;
pub const PI_EXPONENT: i32 = 1;

/// e at exponent [`E_EXPONENT`].
pub const E: i32 = 1_459_366_444;
pub const E_EXPONENT: i32 = 1;

/// log₂(e) = 1.4426950408889634 at exponent [`LOG2E_EXPONENT`].
pub const LOG2E: i32 = 1_549_082_004;
pub const LOG2E_EXPONENT: i32 = 0;

/// Operand exponent of `exp`, fixed by convention with the code generator.
pub const EXP_INPUT_EXPONENT: i32 = 7;

/// Exponent of the power operand `b` in `pow`.
pub const POW_EXPONENT_B: i32 = 15;

/// `sin` and `cos` always answer at this exponent.
pub const SIN_RESULT_EXPONENT: i32 = 1;

#[inline]
pub const fn is_nan(a: i32) -> bool {
    a == NAN
}

#[inline]
pub const fn is_inf(a: i32) -> bool {
    a == INF || a == -INF
}

#[inline]
pub const fn is_finite(a: i32) -> bool {
    !is_nan(a) && !is_inf(a)
}

/// Mantissa of 1.0 at `exponent`, if it is representable there.
///
/// ```
/// use qfix_math::one;
///
/// assert_eq!(one(30), Some(1));
/// assert_eq!(one(0), Some(1 << 30));
/// assert_eq!(one(-1), None); // would need bit 31
/// assert_eq!(one(31), None); // below the least significant bit
/// ```
#[inline]
pub const fn one(exponent: i32) -> Option<i32> {
    let shift = MSB - exponent;
    if shift < 0 || shift > MSB {
        None
    } else {
        Some(1 << shift)
    }
}
