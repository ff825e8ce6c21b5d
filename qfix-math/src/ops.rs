use super::{FixedPointBuffer, FixedPointError};
use crate::constants::{is_inf, is_nan, EXP_INPUT_EXPONENT, INF, MSB, NAN, SIN_RESULT_EXPONENT};
use crate::shift::{saturate, saturate_shift_round};
use crate::value::Fixed;
use crate::{exponential, logarithm, sqrt, trig};

/// Sum of two mantissas at one exponent, with sentinel rules of IEEE addition
fn add_mantissas(a: i32, b: i32) -> i32 {
    if is_nan(a) || is_nan(b) {
        return NAN;
    }
    match (is_inf(a), is_inf(b)) {
        (true, true) if a != b => NAN,
        (true, _) => a,
        (_, true) => b,
        _ => saturate(i64::from(a) + i64::from(b)),
    }
}

fn check_shape(a: &FixedPointBuffer, b: &FixedPointBuffer) -> Result<(), FixedPointError> {
    if a.len() != b.len() {
        log::debug!("shape mismatch: {} vs {}", a.len(), b.len());
        return Err(FixedPointError::ShapeMismatch(a.len(), b.len()));
    }
    Ok(())
}

impl FixedPointBuffer {
    /// Element-wise saturating addition at the larger of the two exponents
    pub fn add(&self, other: &Self) -> Result<Self, FixedPointError> {
        check_shape(self, other)?;
        let exponent = self.exponent.max(other.exponent);
        let a = self.rescale(exponent);
        let b = other.rescale(exponent);

        let data = a
            .data
            .iter()
            .zip(b.data.iter())
            .map(|(&x, &y)| add_mantissas(x, y))
            .collect();

        Ok(Self { data, exponent })
    }

    /// Element-wise saturating subtraction at the larger of the two exponents
    pub fn sub(&self, other: &Self) -> Result<Self, FixedPointError> {
        let negated = Self {
            data: other
                .data
                .iter()
                .map(|&v| if is_nan(v) { v } else { -v })
                .collect(),
            exponent: other.exponent,
        };
        self.add(&negated)
    }

    /// Scalar multiplication (saturating), keeping this buffer's exponent
    pub fn mul_scalar(&self, scalar: Fixed) -> Self {
        // a·s carries exponent ea + es - MSB, so es - MSB brings it back to ea
        let shift = scalar.exponent - MSB;
        let s = scalar.mantissa;
        let data = self
            .data
            .iter()
            .map(|&val| {
                if is_nan(val) || is_nan(s) {
                    NAN
                } else if is_inf(val) || is_inf(s) {
                    if val == 0 || s == 0 {
                        NAN
                    } else if (val < 0) != (s < 0) {
                        -INF
                    } else {
                        INF
                    }
                } else {
                    saturate_shift_round(i64::from(val) * i64::from(s), shift)
                }
            })
            .collect();

        Self {
            data,
            exponent: self.exponent,
        }
    }

    /// Apply a unary kernel `f(mantissa, exponent)` to every element
    pub fn map<F>(&self, exponent_result: i32, f: F) -> Self
    where
        F: Fn(i32, i32) -> i32,
    {
        let data = self.data.iter().map(|&val| f(val, self.exponent)).collect();
        Self {
            data,
            exponent: exponent_result,
        }
    }

    pub fn sin(&self) -> Self {
        self.map(SIN_RESULT_EXPONENT, trig::sin)
    }

    pub fn cos(&self) -> Self {
        self.map(SIN_RESULT_EXPONENT, trig::cos)
    }

    pub fn tan(&self, exponent_result: i32) -> Self {
        self.map(exponent_result, |a, ea| trig::tan(a, ea, exponent_result))
    }

    pub fn exp(&self, exponent_result: i32) -> Self {
        self.rescale(EXP_INPUT_EXPONENT)
            .map(exponent_result, |a, _| exponential::exp(a, exponent_result))
    }

    pub fn log(&self, exponent_result: i32) -> Self {
        self.map(exponent_result, |a, ea| logarithm::log(a, ea, exponent_result))
    }

    pub fn log2(&self, exponent_result: i32) -> Self {
        self.map(exponent_result, |a, ea| logarithm::log2(a, ea, exponent_result))
    }

    pub fn sqrt(&self, exponent_result: i32) -> Self {
        self.map(exponent_result, |a, ea| sqrt::sqrt(a, ea, exponent_result))
    }
}
