//! Bit-exact fingerprint of the kernels.
//!
//! Every kernel is evaluated over a fixed grid of operands and the results are hashed.
//! Two builds that agree on the digest agree on every mantissa in the grid.

use sha2::{Digest, Sha256};

use crate::call::Call;

/// SHA-256 of little-endian mantissas, hex encoded.
pub fn digest_mantissas(mantissas: &[i32]) -> String {
    let mut hasher = Sha256::new();
    for m in mantissas {
        hasher.update(m.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}

/// The calls behind [`determinism_digest`].
pub fn digest_grid() -> Vec<Call> {
    let mut calls = Vec::new();
    for i in -32i32..32 {
        let a = i * 33_554_431; // spans most of the mantissa range
        let magnitude = a.abs();
        let exponent = i.rem_euclid(7) - 2;
        calls.push(Call::MultiplyRound {
            a,
            b: a >> 7,
            shift: -31,
        });
        calls.push(Call::Sin { a, exponent_a: 3 });
        calls.push(Call::Cos {
            a,
            exponent_a: exponent,
        });
        calls.push(Call::Tan {
            a,
            exponent_a: 2,
            exponent_result: 6,
        });
        calls.push(Call::Exp {
            a: a >> 2,
            exponent_result: 12,
        });
        calls.push(Call::Log {
            a: magnitude,
            exponent_a: exponent,
            exponent_result: 5,
        });
        calls.push(Call::Log2 {
            a: magnitude,
            exponent_a: 10,
            exponent_result: 6,
        });
        calls.push(Call::Mod {
            a,
            b: 123_456_789,
            exponent_a: 9,
            exponent_b: exponent,
        });
        calls.push(Call::Pow {
            a: magnitude,
            b: i << 13,
            exponent_a: 3,
            exponent_result: 14,
        });
        calls.push(Call::Sqrt {
            a: magnitude,
            exponent_a: exponent,
            exponent_result: 2,
        });
    }
    calls
}

/// Digest of every kernel over [`digest_grid`].
pub fn determinism_digest() -> String {
    let mantissas: Vec<i32> = digest_grid().iter().map(Call::evaluate).collect();
    digest_mantissas(&mantissas)
}
