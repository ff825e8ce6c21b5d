// Integration tests across the workspace: JSON batch → dispatcher → matrix ops.
use qfix::qfix_math::{cos, sin, SIN_RESULT_EXPONENT};
use qfix::{run_batch, Call, Fixed, FixedMatrixOps, FixedPointBuffer, INF, MSB, NAN};

/// A batch file as the CLI reads it, evaluated end to end.
#[test]
fn test_json_batch_pipeline() {
    let json = r#"[
        {"exp": {"a": 0, "exponent_result": 10}},
        {"log2": {"a": 8, "exponent_a": 30, "exponent_result": 15}},
        {"sqrt": {"a": -1, "exponent_a": 30, "exponent_result": 30}},
        {"mod": {"a": 7, "b": 3, "exponent_a": 30, "exponent_b": 30}},
        {"multiply_round": {"a": 3, "b": 5, "shift": -1}}
    ]"#;
    let calls: Vec<Call> = serde_json::from_str(json).unwrap();
    let results = run_batch(&calls).unwrap();

    let mantissas: Vec<i32> = results.iter().map(|r| r.mantissa).collect();
    assert_eq!(mantissas, vec![1 << 20, 3 << 15, NAN, 1, 8]);
    assert_eq!(results[0].value, Some(1.0));
    assert_eq!(results[1].value, Some(3.0));
    assert!(results[2].value.unwrap().is_nan());
    assert_eq!(results[4].exponent, None);

    // results serialize back out; NaN becomes null
    let out = serde_json::to_string(&results).unwrap();
    assert!(out.contains("\"value\":null"));
}

/// Rotate a set of 2-vectors with sin/cos buffers and check lengths survive.
#[test]
fn test_rotation_preserves_length() {
    let xs = FixedPointBuffer::from_f64(&[1.0, -2.0, 0.5, 3.0], 4);
    let ys = FixedPointBuffer::from_f64(&[0.0, 1.5, -0.25, 3.0], 4);
    let angle = Fixed::from_f64(0.7, 2);
    let s = Fixed::new(sin(angle.mantissa, angle.exponent), SIN_RESULT_EXPONENT);
    let c = Fixed::new(cos(angle.mantissa, angle.exponent), SIN_RESULT_EXPONENT);

    // x' = x·c − y·s, y' = x·s + y·c; all products land at exponent 4
    let shift = 1 - MSB;
    let xc: FixedPointBuffer = xs.multiply_scalar(c, shift).into();
    let ys_s: FixedPointBuffer = ys.multiply_scalar(s, shift).into();
    let xs_s: FixedPointBuffer = xs.multiply_scalar(s, shift).into();
    let yc: FixedPointBuffer = ys.multiply_scalar(c, shift).into();
    let x2 = xc.sub(&ys_s).unwrap();
    let y2 = xs_s.add(&yc).unwrap();
    assert_eq!(x2.exponent, 4);

    let before = xs.multiply_elementwise(&xs, -MSB).unwrap();
    let before: FixedPointBuffer = before.into();
    let yy: FixedPointBuffer = ys.multiply_elementwise(&ys, -MSB).unwrap().into();
    let before = before.add(&yy).unwrap().sqrt(4).to_f64();

    let xx2: FixedPointBuffer = x2.multiply_elementwise(&x2, -MSB).unwrap().into();
    let yy2: FixedPointBuffer = y2.multiply_elementwise(&y2, -MSB).unwrap().into();
    let after = xx2.add(&yy2).unwrap().sqrt(4).to_f64();

    for (b, a) in before.iter().zip(after.iter()) {
        assert!((b - a).abs() < 1e-6, "{} vs {}", b, a);
    }
}

/// Softmax-style normalization: exp, then divide by the 1-norm.
#[test]
fn test_exp_normalize() {
    let logits = FixedPointBuffer::from_f64(&[0.5, -1.0, 2.0, 0.0], 7);
    let weights = logits.exp(5);
    let total = weights.norm(1 << 15, 6).unwrap();

    // weights at 5 over total at 6: 5 − 6 + MSB − shift = 1
    let probabilities: FixedPointBuffer = weights.divide_scalar(total, MSB - 2).into();
    assert_eq!(probabilities.exponent, 1);

    let p = probabilities.to_f64();
    let sum: f64 = p.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6, "sum {}", sum);

    let reference: Vec<f64> = [0.5f64, -1.0, 2.0, 0.0].iter().map(|x| x.exp()).collect();
    let reference_total: f64 = reference.iter().sum();
    for (got, want) in p.iter().zip(reference.iter()) {
        assert!((got - want / reference_total).abs() < 1e-6);
    }
}

/// Sentinels flow through buffers and calls without turning into garbage.
#[test]
fn test_sentinels_across_layers() {
    let a = FixedPointBuffer::from_raw(vec![NAN, INF, -INF, 0], 5).unwrap();
    assert_eq!(a.sin().data, vec![NAN, NAN, NAN, 0]);
    assert_eq!(a.exp(5).data[..3], [NAN, INF, 0]);

    let doubled: FixedPointBuffer = a.multiply_scalar(Fixed::from_f64(2.0, 2), 2 - MSB).into();
    assert_eq!(doubled.data, vec![NAN, INF, -INF, 0]);

    let call = Call::Pow {
        a: INF,
        b: 3 << 15,
        exponent_a: 5,
        exponent_result: 5,
    };
    assert_eq!(call.run().unwrap().value, Some(f64::INFINITY));
}
