//! # qfix-math
//!
//! Integer-only elementary functions for fixed-point simulation code.
//!
//! Every value is a signed 32-bit mantissa whose binary point is described by an
//! out-of-band exponent: `value = mantissa × 2^(exponent − MSB)` with [`MSB`] = 30.
//! Kernels take the mantissa plus the exponents the caller (usually a code generator)
//! assigned ahead of time, and return a mantissa already aligned to the requested
//! result exponent.
//!
//! Errors never surface as `Result`: like IEEE floats, domain errors give [`NAN`],
//! overflow saturates to [`INF`] / `-INF`, underflow gives `0`.
//!
//! Exponent arguments are expected to be small integers (well inside ±[`MAX_EXPONENT`]).
//!
//! ```
//! use qfix_math::{exp, sqrt, Fixed};
//!
//! // exp(0) at result exponent 1 is exactly one
//! assert_eq!(exp(0, 1), 1 << 29);
//!
//! // sqrt(2.0): operand at exponent 2, result at exponent 1
//! let root = sqrt(1 << 29, 2, 1);
//! assert!((Fixed::new(root, 1).to_f64() - 2f64.sqrt()).abs() < 1e-8);
//! ```

pub mod constants;
pub mod exponential;
pub mod fixed_point;
pub mod logarithm;
pub mod modulo;
pub mod ops;
pub mod pow;
pub mod shift;
pub mod sqrt;
pub mod trig;
pub mod value;

pub use constants::{
    is_finite, is_inf, is_nan, one, E, E_EXPONENT, EXP_INPUT_EXPONENT, INF, LOG2E,
    LOG2E_EXPONENT, MAX_EXPONENT, MSB, NAN, PI, PI_EXPONENT, POW_EXPONENT_B,
    SIN_RESULT_EXPONENT, ZERO,
};
pub use exponential::exp;
pub use fixed_point::{FixedPointBuffer, FixedPointError};
pub use logarithm::{log, log2};
pub use modulo::modulo;
pub use pow::pow;
pub use shift::{
    multiply_round, saturate, saturate_shift_round, saturate_shift_truncate, shift_round,
    shift_truncate,
};
pub use sqrt::sqrt;
pub use trig::{cos, sin, tan};
pub use value::Fixed;
