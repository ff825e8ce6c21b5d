//! # qfix
//!
//! Umbrella crate for the qfix workspace.
//!
//! - [`qfix_math`]: the scalar kernels, [`Fixed`] and [`FixedPointBuffer`]
//! - [`qfix_core`]: [`FixedMatrixOps`] and the serializable [`Call`]

pub use qfix_core;
pub use qfix_math;

pub use qfix_core::{run_batch, Call, CallError, FixedMatrixOps, MatrixError, MatrixResult};
pub use qfix_math::{Fixed, FixedPointBuffer, FixedPointError, INF, MSB, NAN};
