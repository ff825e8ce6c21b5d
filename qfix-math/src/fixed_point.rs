use thiserror::Error;

use crate::constants::{is_inf, is_nan, MAX_EXPONENT};
use crate::shift::saturate_shift_round;
use crate::value::Fixed;

/// A vector of mantissas sharing one exponent
/// Each element is `data[i] × 2^(exponent − MSB)`
/// Zero handling: 0 is exact at every exponent
/// Overflow behavior: Saturating to ±INF, never NAN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPointBuffer {
    /// Mantissas, sentinels included
    pub data: Vec<i32>,
    pub exponent: i32,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FixedPointError {
    #[error("Shape mismatch: {0} vs {1}")]
    ShapeMismatch(usize, usize),
    #[error("Exponent {0} outside ±{max}", max = MAX_EXPONENT)]
    ExponentOutOfRange(i32),
}

impl FixedPointBuffer {
    /// Create a new buffer of zeros
    pub fn new(size: usize, exponent: i32) -> Self {
        Self {
            data: vec![0; size],
            exponent,
        }
    }

    /// Wrap existing mantissas, checking the exponent is inside the calling convention
    pub fn from_raw(data: Vec<i32>, exponent: i32) -> Result<Self, FixedPointError> {
        if exponent.abs() > MAX_EXPONENT {
            return Err(FixedPointError::ExponentOutOfRange(exponent));
        }
        Ok(Self { data, exponent })
    }

    /// Quantize from f64 (round to nearest, saturating to ±INF)
    pub fn from_f64(data: &[f64], exponent: i32) -> Self {
        let data = data
            .iter()
            .map(|&val| Fixed::from_f64(val, exponent).mantissa)
            .collect();
        Self { data, exponent }
    }

    /// Convert back to f64; sentinels become NaN / ±infinity
    pub fn to_f64(&self) -> Vec<f64> {
        self.data
            .iter()
            .map(|&val| Fixed::new(val, self.exponent).to_f64())
            .collect()
    }

    /// Element `i` as a standalone value
    pub fn get(&self, i: usize) -> Option<Fixed> {
        self.data.get(i).map(|&m| Fixed::new(m, self.exponent))
    }

    /// Move every element to `exponent`, rounding down-shifts and saturating up-shifts
    pub fn rescale(&self, exponent: i32) -> Self {
        let shift = self.exponent - exponent;
        let data = self
            .data
            .iter()
            .map(|&val| {
                if is_nan(val) || is_inf(val) {
                    val
                } else {
                    saturate_shift_round(i64::from(val), shift)
                }
            })
            .collect();
        Self { data, exponent }
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{INF, NAN};

    #[test]
    fn test_conversion_roundtrip() {
        let input = vec![0.0, 1.0, -1.0, 0.5, -0.5, 127.0, -128.0];
        let buffer = FixedPointBuffer::from_f64(&input, 8);
        let output = buffer.to_f64();

        for (i, &val) in input.iter().enumerate() {
            let diff = (val - output[i]).abs();
            assert!(diff < 1e-6, "Mismatch at {}: {} vs {}", i, val, output[i]);
        }
    }

    #[test]
    fn test_saturation() {
        // exponent 8 covers (-512, 512)
        let buffer = FixedPointBuffer::from_f64(&[600.0, -600.0, f64::NAN], 8);
        assert_eq!(buffer.data, vec![INF, -INF, NAN]);
        let output = buffer.to_f64();
        assert_eq!(output[0], f64::INFINITY);
        assert_eq!(output[1], f64::NEG_INFINITY);
        assert!(output[2].is_nan());
    }

    #[test]
    fn test_rescale_keeps_sentinels() {
        let buffer = FixedPointBuffer::from_raw(vec![1 << 20, NAN, -INF, 3], 10).unwrap();
        let rescaled = buffer.rescale(12);
        assert_eq!(rescaled.exponent, 12);
        assert_eq!(rescaled.data, vec![1 << 18, NAN, -INF, 1]);
        // shifting up past the top saturates
        assert_eq!(buffer.rescale(-1).data[0], INF);
    }

    #[test]
    fn test_exponent_out_of_range() {
        let err = FixedPointBuffer::from_raw(vec![1], MAX_EXPONENT + 1).unwrap_err();
        assert_eq!(err, FixedPointError::ExponentOutOfRange(MAX_EXPONENT + 1));
    }
}
