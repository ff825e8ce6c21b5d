use qfix_core::{determinism_digest, digest_mantissas};
use qfix_math::FixedPointBuffer;

fn main() {
    let vals: Vec<f64> = vec![
        0.0, 1.0, -1.0, 0.5, -0.5, 0.25, -0.25, 0.75, -0.75, 1.25, -1.25, 127.0, -128.0,
    ];
    let buf = FixedPointBuffer::from_f64(&vals, 8);
    println!("ENCODING_HASH {}", digest_mantissas(&buf.data));
    println!("KERNEL_HASH {}", determinism_digest());
}
