use qfix_math::{
    is_inf, is_nan, pow, saturate_shift_round, sqrt, Fixed, FixedPointBuffer, FixedPointError,
    INF, MSB, NAN, POW_EXPONENT_B,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mantissas together with the exponent they ended up at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixResult<M> {
    pub value: M,
    pub exponent: i32,
}

impl From<MatrixResult<Vec<i32>>> for FixedPointBuffer {
    fn from(result: MatrixResult<Vec<i32>>) -> Self {
        FixedPointBuffer {
            data: result.value,
            exponent: result.exponent,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MatrixError {
    #[error("Shape mismatch: {0} vs {1}")]
    ShapeMismatch(usize, usize),
    #[error("Norm order must be non-negative, got mantissa {0}")]
    InvalidNorm(i32),
    #[error(transparent)]
    Buffer(#[from] FixedPointError),
}

/// Elementwise arithmetic over containers of mantissas that share one exponent.
///
/// `shift` arguments move the raw mantissa result by `2^shift`; the exponent in the
/// returned [`MatrixResult`] accounts for it, so the represented values do not depend on
/// the shift beyond rounding and saturation. Sentinels follow IEEE rules.
pub trait FixedMatrixOps {
    type Output;

    /// Same values with mantissas moved up by `shift` bits (down when negative).
    fn shift(&self, shift: i32) -> MatrixResult<Self::Output>;

    /// `a[i] · b[i]` at exponent `ea + eb − MSB − shift`.
    fn multiply_elementwise(
        &self,
        other: &Self,
        shift: i32,
    ) -> Result<MatrixResult<Self::Output>, MatrixError>;

    /// `a[i] · b` at exponent `ea + eb − MSB − shift`.
    fn multiply_scalar(&self, b: Fixed, shift: i32) -> MatrixResult<Self::Output>;

    /// `a[i] / b[i]` at exponent `ea − eb + MSB − shift`.
    fn divide_elementwise(
        &self,
        other: &Self,
        shift: i32,
    ) -> Result<MatrixResult<Self::Output>, MatrixError>;

    /// `a[i] / b` at exponent `ea − eb + MSB − shift`.
    fn divide_scalar(&self, b: Fixed, shift: i32) -> MatrixResult<Self::Output>;

    /// p-norm with `n` at exponent 15. `n == 0` counts nonzero elements and
    /// `n == INF` takes the largest magnitude.
    fn norm(&self, n: i32, exponent_result: i32) -> Result<Fixed, MatrixError>;
}

fn multiply_mantissas(a: i32, b: i32, shift: i32) -> i32 {
    if is_nan(a) || is_nan(b) {
        return NAN;
    }
    if is_inf(a) || is_inf(b) {
        return if a == 0 || b == 0 {
            NAN
        } else if (a < 0) != (b < 0) {
            -INF
        } else {
            INF
        };
    }
    // a·b has its binary point at bit 2·MSB; reading it at bit MSB costs MSB of exponent,
    // which the caller folds into the result exponent together with `shift`.
    saturate_shift_round(i64::from(a) * i64::from(b), shift)
}

/// Extra quotient bits kept before the final shift.
const DIVIDE_GUARD_BITS: i32 = 32;

fn divide_mantissas(a: i32, b: i32, shift: i32) -> i32 {
    if is_nan(a) || is_nan(b) {
        return NAN;
    }
    let negative = (a < 0) != (b < 0);
    let signed_inf = if negative { -INF } else { INF };
    match (is_inf(a), is_inf(b)) {
        (true, true) => return NAN,
        (true, false) => return signed_inf,
        (false, true) => return 0,
        _ => {}
    }
    if b == 0 {
        if a == 0 {
            log::trace!("divide: 0 / 0");
            return NAN;
        }
        log::trace!("divide: {} / 0", a);
        return signed_inf;
    }
    let quotient = (i64::from(a) << DIVIDE_GUARD_BITS) / i64::from(b);
    saturate_shift_round(quotient, shift - DIVIDE_GUARD_BITS)
}

fn check_shape(a: &FixedPointBuffer, b: &FixedPointBuffer) -> Result<(), MatrixError> {
    if a.len() != b.len() {
        log::debug!("matrix shape mismatch: {} vs {}", a.len(), b.len());
        return Err(MatrixError::ShapeMismatch(a.len(), b.len()));
    }
    Ok(())
}

impl FixedMatrixOps for FixedPointBuffer {
    type Output = Vec<i32>;

    fn shift(&self, shift: i32) -> MatrixResult<Vec<i32>> {
        let value = self
            .data
            .iter()
            .map(|&a| {
                if is_nan(a) || is_inf(a) {
                    a
                } else {
                    saturate_shift_round(i64::from(a), shift)
                }
            })
            .collect();
        MatrixResult {
            value,
            exponent: self.exponent - shift,
        }
    }

    fn multiply_elementwise(
        &self,
        other: &Self,
        shift: i32,
    ) -> Result<MatrixResult<Vec<i32>>, MatrixError> {
        check_shape(self, other)?;
        let value = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| multiply_mantissas(a, b, shift))
            .collect();
        Ok(MatrixResult {
            value,
            exponent: self.exponent + other.exponent - MSB - shift,
        })
    }

    fn multiply_scalar(&self, b: Fixed, shift: i32) -> MatrixResult<Vec<i32>> {
        let value = self
            .data
            .iter()
            .map(|&a| multiply_mantissas(a, b.mantissa, shift))
            .collect();
        MatrixResult {
            value,
            exponent: self.exponent + b.exponent - MSB - shift,
        }
    }

    fn divide_elementwise(
        &self,
        other: &Self,
        shift: i32,
    ) -> Result<MatrixResult<Vec<i32>>, MatrixError> {
        check_shape(self, other)?;
        let value = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| divide_mantissas(a, b, shift))
            .collect();
        Ok(MatrixResult {
            value,
            exponent: self.exponent - other.exponent + MSB - shift,
        })
    }

    fn divide_scalar(&self, b: Fixed, shift: i32) -> MatrixResult<Vec<i32>> {
        let value = self
            .data
            .iter()
            .map(|&a| divide_mantissas(a, b.mantissa, shift))
            .collect();
        MatrixResult {
            value,
            exponent: self.exponent - b.exponent + MSB - shift,
        }
    }

    fn norm(&self, n: i32, exponent_result: i32) -> Result<Fixed, MatrixError> {
        if is_nan(n) || n < 0 {
            return Err(MatrixError::InvalidNorm(n));
        }
        if self.data.iter().any(|&a| is_nan(a)) {
            return Ok(Fixed::nan(exponent_result));
        }
        let ea = self.exponent;
        let at_result = |wide: i64, exponent: i32| {
            Fixed::new(saturate_shift_round(wide, exponent - exponent_result), exponent_result)
        };

        if n == 0 {
            let count = self.data.iter().filter(|&&a| a != 0).count() as i64;
            // a plain integer sits at exponent MSB
            return Ok(at_result(count, MSB));
        }

        let magnitudes: Vec<i64> = self.data.iter().map(|&a| i64::from(a).abs()).collect();
        let largest = magnitudes.iter().copied().max().unwrap_or(0);
        if largest == 0 {
            return Ok(Fixed::zero(exponent_result));
        }
        if largest >= i64::from(INF) {
            return Ok(Fixed::infinity(exponent_result));
        }
        if n == INF {
            return Ok(at_result(largest, ea));
        }

        let unit = 1 << (MSB - POW_EXPONENT_B);
        if n == unit {
            return Ok(at_result(magnitudes.iter().sum(), ea));
        }
        if n == 2 * unit {
            return Ok(euclidean(&magnitudes, ea, exponent_result));
        }

        // Scale by the largest magnitude so every ratio is in (0, 1] at exponent 1,
        // which keeps each power below one as well.
        let ratio_shift = MSB - 1;
        let mut sum: i64 = magnitudes
            .iter()
            .map(|&m| {
                let ratio = ((m << ratio_shift) / largest) as i32;
                i64::from(pow(ratio, n, 1, 1))
            })
            .sum();
        let mut exponent_sum = 1;
        while sum > i64::from(INF) {
            sum = (sum + 1) >> 1;
            exponent_sum += 1;
        }

        // sum ≥ 1, so sum^(1/n) < 2^((exponent_sum + 1) / n)
        let inverse = (1i64 << MSB) / i64::from(n);
        let inverse = inverse.min(i64::from(INF)) as i32;
        let exponent_root = ((i64::from(exponent_sum) + 1) * i64::from(unit) + i64::from(n) - 1)
            / i64::from(n)
            + 1;
        let exponent_root = exponent_root as i32;
        let root = pow(sum as i32, inverse, exponent_sum, exponent_root);

        // root at exponent_root times largest at ea lands at exponent_root + ea - MSB
        Ok(at_result(i64::from(root) * largest, exponent_root + ea - MSB))
    }
}

/// √(Σ a²) with the square sum kept in 128 bits until it is narrowed for `sqrt`.
fn euclidean(magnitudes: &[i64], exponent_a: i32, exponent_result: i32) -> Fixed {
    let mut sum: u128 = magnitudes
        .iter()
        .map(|&m| {
            let m = m as u128;
            m * m
        })
        .sum();
    // a² has its binary point at bit 2·MSB, so read at bit MSB it sits at 2·ea − MSB
    let mut exponent_sum = 2 * exponent_a - MSB;
    while sum > INF as u128 {
        sum >>= 1;
        exponent_sum += 1;
    }
    Fixed::new(sqrt(sum as i32, exponent_sum, exponent_result), exponent_result)
}
