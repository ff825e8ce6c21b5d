//! A mantissa paired with its exponent.
//!
//! The kernels keep the raw `(mantissa, exponent)` calling convention. `Fixed` bundles
//! the two for callers that would rather carry the exponent with the value.

use serde::{Deserialize, Serialize};

use crate::constants::{is_inf, is_nan, EXP_INPUT_EXPONENT, INF, MSB, NAN, POW_EXPONENT_B};
use crate::shift::saturate_shift_round;
use crate::{exponential, logarithm, modulo, pow, sqrt, trig};

/// `mantissa × 2^(exponent − MSB)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixed {
    pub mantissa: i32,
    pub exponent: i32,
}

impl Fixed {
    pub const fn new(mantissa: i32, exponent: i32) -> Self {
        Self { mantissa, exponent }
    }

    pub const fn zero(exponent: i32) -> Self {
        Self::new(0, exponent)
    }

    pub const fn nan(exponent: i32) -> Self {
        Self::new(NAN, exponent)
    }

    pub const fn infinity(exponent: i32) -> Self {
        Self::new(INF, exponent)
    }

    /// 1.0 at `exponent`, saturated to `INF` (or 0) where it does not fit.
    pub fn one(exponent: i32) -> Self {
        Self::new(exponential::exp(0, exponent), exponent)
    }

    /// Quantize a float, rounding to nearest and saturating to `±INF`.
    ///
    /// Float NaN and infinities map onto the sentinels.
    pub fn from_f64(value: f64, exponent: i32) -> Self {
        let mantissa = if value.is_nan() {
            NAN
        } else {
            let scaled = (value * 2f64.powi(MSB - exponent)).round();
            if scaled >= f64::from(INF) {
                INF
            } else if scaled <= -f64::from(INF) {
                -INF
            } else {
                scaled as i32
            }
        };
        Self::new(mantissa, exponent)
    }

    /// Decode to a float. Sentinels decode to float NaN / infinities.
    pub fn to_f64(self) -> f64 {
        if is_nan(self.mantissa) {
            f64::NAN
        } else if self.mantissa == INF {
            f64::INFINITY
        } else if self.mantissa == -INF {
            f64::NEG_INFINITY
        } else {
            f64::from(self.mantissa) * 2f64.powi(self.exponent - MSB)
        }
    }

    pub const fn is_nan(self) -> bool {
        is_nan(self.mantissa)
    }

    pub const fn is_inf(self) -> bool {
        is_inf(self.mantissa)
    }

    /// Same value at another exponent, rounding and saturating. Sentinels are kept.
    pub fn rescale(self, exponent: i32) -> Self {
        if is_nan(self.mantissa) || is_inf(self.mantissa) {
            return Self::new(self.mantissa, exponent);
        }
        let mantissa = saturate_shift_round(i64::from(self.mantissa), self.exponent - exponent);
        Self::new(mantissa, exponent)
    }

    /// Bring both values to the larger of the two exponents so that neither overflows.
    pub fn align(self, other: Self) -> (Self, Self) {
        let exponent = self.exponent.max(other.exponent);
        (self.rescale(exponent), other.rescale(exponent))
    }

    pub fn sin(self) -> Self {
        Self::new(trig::sin(self.mantissa, self.exponent), crate::SIN_RESULT_EXPONENT)
    }

    pub fn cos(self) -> Self {
        Self::new(trig::cos(self.mantissa, self.exponent), crate::SIN_RESULT_EXPONENT)
    }

    pub fn tan(self, exponent_result: i32) -> Self {
        Self::new(
            trig::tan(self.mantissa, self.exponent, exponent_result),
            exponent_result,
        )
    }

    /// `e^self`. The operand is rescaled to the exponent `exp` expects first.
    pub fn exp(self, exponent_result: i32) -> Self {
        let a = self.rescale(EXP_INPUT_EXPONENT).mantissa;
        Self::new(exponential::exp(a, exponent_result), exponent_result)
    }

    pub fn log(self, exponent_result: i32) -> Self {
        Self::new(
            logarithm::log(self.mantissa, self.exponent, exponent_result),
            exponent_result,
        )
    }

    pub fn log2(self, exponent_result: i32) -> Self {
        Self::new(
            logarithm::log2(self.mantissa, self.exponent, exponent_result),
            exponent_result,
        )
    }

    /// `|self| mod |divisor|`, at the smaller of the two exponents.
    pub fn modulo(self, divisor: Self) -> Self {
        Self::new(
            modulo::modulo(self.mantissa, divisor.mantissa, self.exponent, divisor.exponent),
            self.exponent.min(divisor.exponent),
        )
    }

    /// `self^power`. The power is rescaled to the exponent `pow` expects first.
    pub fn pow(self, power: Self, exponent_result: i32) -> Self {
        let b = power.rescale(POW_EXPONENT_B).mantissa;
        Self::new(
            pow::pow(self.mantissa, b, self.exponent, exponent_result),
            exponent_result,
        )
    }

    pub fn sqrt(self, exponent_result: i32) -> Self {
        Self::new(
            sqrt::sqrt(self.mantissa, self.exponent, exponent_result),
            exponent_result,
        )
    }
}
