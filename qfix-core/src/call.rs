use qfix_math::{
    cos, exp, log, log2, modulo, multiply_round, pow, sin, sqrt, tan, Fixed, MAX_EXPONENT,
    SIN_RESULT_EXPONENT,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One kernel invocation with every operand and exponent spelled out
///
/// This enum is the serializable form of the kernel calling convention:
/// - JSON (externally tagged, snake_case) for batch files
/// - bincode for compact storage via [`Call::to_bytes`]
///
/// # Example
/// ```
/// use qfix_core::Call;
///
/// let call = Call::Sqrt { a: 4, exponent_a: 30, exponent_result: 30 };
/// assert_eq!(call.evaluate(), 2);
/// assert_eq!(call.result_exponent(), Some(30));
///
/// let bytes = call.to_bytes().unwrap();
/// assert_eq!(Call::from_bytes(&bytes).unwrap(), call);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Call {
    /// `round(a · b · 2^shift)`
    MultiplyRound { a: i32, b: i32, shift: i32 },
    Sin { a: i32, exponent_a: i32 },
    Cos { a: i32, exponent_a: i32 },
    Tan {
        a: i32,
        exponent_a: i32,
        exponent_result: i32,
    },
    /// Operand always at exponent 7
    Exp { a: i32, exponent_result: i32 },
    Log {
        a: i32,
        exponent_a: i32,
        exponent_result: i32,
    },
    Log2 {
        a: i32,
        exponent_a: i32,
        exponent_result: i32,
    },
    Mod {
        a: i32,
        b: i32,
        exponent_a: i32,
        exponent_b: i32,
    },
    /// `b` always at exponent 15
    Pow {
        a: i32,
        b: i32,
        exponent_a: i32,
        exponent_result: i32,
    },
    Sqrt {
        a: i32,
        exponent_a: i32,
        exponent_result: i32,
    },
}

#[derive(Error, Debug)]
pub enum CallError {
    #[error("{call}: exponent {exponent} outside ±{max}", max = MAX_EXPONENT)]
    ExponentOutOfRange { call: &'static str, exponent: i32 },
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// A call together with what it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub call: Call,
    pub mantissa: i32,
    /// `None` when the result exponent is not implied by the call (`multiply_round`)
    pub exponent: Option<i32>,
    /// Decoded value; sentinels decode to non-finite floats
    pub value: Option<f64>,
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::MultiplyRound { .. } => "multiply_round",
            Call::Sin { .. } => "sin",
            Call::Cos { .. } => "cos",
            Call::Tan { .. } => "tan",
            Call::Exp { .. } => "exp",
            Call::Log { .. } => "log",
            Call::Log2 { .. } => "log2",
            Call::Mod { .. } => "mod",
            Call::Pow { .. } => "pow",
            Call::Sqrt { .. } => "sqrt",
        }
    }

    /// Run the kernel
    pub fn evaluate(&self) -> i32 {
        match *self {
            Call::MultiplyRound { a, b, shift } => multiply_round(a, b, shift),
            Call::Sin { a, exponent_a } => sin(a, exponent_a),
            Call::Cos { a, exponent_a } => cos(a, exponent_a),
            Call::Tan {
                a,
                exponent_a,
                exponent_result,
            } => tan(a, exponent_a, exponent_result),
            Call::Exp { a, exponent_result } => exp(a, exponent_result),
            Call::Log {
                a,
                exponent_a,
                exponent_result,
            } => log(a, exponent_a, exponent_result),
            Call::Log2 {
                a,
                exponent_a,
                exponent_result,
            } => log2(a, exponent_a, exponent_result),
            Call::Mod {
                a,
                b,
                exponent_a,
                exponent_b,
            } => modulo(a, b, exponent_a, exponent_b),
            Call::Pow {
                a,
                b,
                exponent_a,
                exponent_result,
            } => pow(a, b, exponent_a, exponent_result),
            Call::Sqrt {
                a,
                exponent_a,
                exponent_result,
            } => sqrt(a, exponent_a, exponent_result),
        }
    }

    /// Exponent of the mantissa [`Call::evaluate`] returns
    pub fn result_exponent(&self) -> Option<i32> {
        match *self {
            Call::MultiplyRound { .. } => None,
            Call::Sin { .. } | Call::Cos { .. } => Some(SIN_RESULT_EXPONENT),
            Call::Mod {
                exponent_a,
                exponent_b,
                ..
            } => Some(exponent_a.min(exponent_b)),
            Call::Tan {
                exponent_result, ..
            }
            | Call::Exp {
                exponent_result, ..
            }
            | Call::Log {
                exponent_result, ..
            }
            | Call::Log2 {
                exponent_result, ..
            }
            | Call::Pow {
                exponent_result, ..
            }
            | Call::Sqrt {
                exponent_result, ..
            } => Some(exponent_result),
        }
    }

    /// Run the kernel and pair the mantissa with its exponent
    pub fn evaluate_fixed(&self) -> Option<Fixed> {
        let mantissa = self.evaluate();
        self.result_exponent()
            .map(|exponent| Fixed::new(mantissa, exponent))
    }

    fn exponents(&self) -> Vec<i32> {
        match *self {
            Call::MultiplyRound { .. } => vec![],
            Call::Sin { exponent_a, .. } | Call::Cos { exponent_a, .. } => vec![exponent_a],
            Call::Exp {
                exponent_result, ..
            } => vec![exponent_result],
            Call::Mod {
                exponent_a,
                exponent_b,
                ..
            } => vec![exponent_a, exponent_b],
            Call::Tan {
                exponent_a,
                exponent_result,
                ..
            }
            | Call::Log {
                exponent_a,
                exponent_result,
                ..
            }
            | Call::Log2 {
                exponent_a,
                exponent_result,
                ..
            }
            | Call::Pow {
                exponent_a,
                exponent_result,
                ..
            }
            | Call::Sqrt {
                exponent_a,
                exponent_result,
                ..
            } => vec![exponent_a, exponent_result],
        }
    }

    /// Check every exponent lies inside the supported calling convention
    pub fn validate(&self) -> Result<(), CallError> {
        match self.exponents().into_iter().find(|e| e.abs() > MAX_EXPONENT) {
            Some(exponent) => Err(CallError::ExponentOutOfRange {
                call: self.name(),
                exponent,
            }),
            None => Ok(()),
        }
    }

    /// Validate, run and record the call
    pub fn run(&self) -> Result<Evaluation, CallError> {
        self.validate()?;
        let mantissa = self.evaluate();
        let exponent = self.result_exponent();
        let value = exponent.map(|e| Fixed::new(mantissa, e).to_f64());
        log::trace!("{} -> {}", self.name(), mantissa);
        Ok(Evaluation {
            call: *self,
            mantissa,
            exponent,
            value,
        })
    }

    /// Serialize call to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, CallError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize call from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CallError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Run a batch, stopping at the first invalid call
pub fn run_batch(calls: &[Call]) -> Result<Vec<Evaluation>, CallError> {
    calls.iter().map(Call::run).collect()
}
