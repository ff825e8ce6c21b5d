//! # qfix-core
//!
//! Building blocks above the scalar kernels of `qfix-math`.
//!
//! This crate defines:
//! - [`FixedMatrixOps`]: elementwise shift / multiply / divide and p-norms over
//!   mantissa containers, returning a [`MatrixResult`] that carries its exponent
//! - [`Call`]: one kernel invocation as a serializable value, with a dispatcher
//!   ([`Call::evaluate`]) and batch runner ([`run_batch`])
//!
//! Also provides [`determinism_digest`], a SHA-256 fingerprint of kernel output over a
//! fixed operand grid.

pub mod call;
pub mod digest;
pub mod matrix;

pub use call::{run_batch, Call, CallError, Evaluation};
pub use digest::{determinism_digest, digest_grid, digest_mantissas};
pub use matrix::{FixedMatrixOps, MatrixError, MatrixResult};
