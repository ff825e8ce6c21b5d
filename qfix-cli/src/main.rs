use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use qfix_core::{determinism_digest, run_batch, Call, Evaluation};
use qfix_math::{Fixed, EXP_INPUT_EXPONENT, POW_EXPONENT_B};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "qfix")]
#[command(author, version, about = "Evaluate fixed-point kernels", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG is used otherwise, default warn)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate one kernel on decimal operands
    Eval {
        #[arg(value_enum)]
        function: Function,

        /// First operand
        #[arg(long, allow_hyphen_values = true)]
        a: f64,

        /// Second operand (mod, pow, multiply-round)
        #[arg(long, allow_hyphen_values = true)]
        b: Option<f64>,

        /// Exponent `a` is quantized at (exp always uses 7)
        #[arg(long, default_value_t = 8, allow_hyphen_values = true)]
        exponent_a: i32,

        /// Exponent `b` is quantized at (pow always uses 15)
        #[arg(long, default_value_t = 8, allow_hyphen_values = true)]
        exponent_b: i32,

        /// Exponent of the result
        #[arg(long, default_value_t = 8, allow_hyphen_values = true)]
        exponent_result: i32,

        /// Shift for multiply-round
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        shift: i32,
    },

    /// Evaluate a JSON array of calls
    Batch {
        /// Input JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Print the kernel determinism digest
    Digest {
        /// Fail unless the digest equals this hex string
        #[arg(long)]
        expect: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Function {
    MultiplyRound,
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
    Log2,
    Mod,
    Pow,
    Sqrt,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_call(
    function: Function,
    a: f64,
    b: Option<f64>,
    exponent_a: i32,
    exponent_b: i32,
    exponent_result: i32,
    shift: i32,
) -> Result<Call> {
    let second = |exponent: i32| -> Result<i32> {
        let b = b.with_context(|| format!("{:?} needs --b", function))?;
        Ok(Fixed::from_f64(b, exponent).mantissa)
    };
    let m = Fixed::from_f64(a, exponent_a).mantissa;

    let call = match function {
        Function::MultiplyRound => Call::MultiplyRound {
            a: m,
            b: second(exponent_b)?,
            shift,
        },
        Function::Sin => Call::Sin { a: m, exponent_a },
        Function::Cos => Call::Cos { a: m, exponent_a },
        Function::Tan => Call::Tan {
            a: m,
            exponent_a,
            exponent_result,
        },
        Function::Exp => Call::Exp {
            a: Fixed::from_f64(a, EXP_INPUT_EXPONENT).mantissa,
            exponent_result,
        },
        Function::Log => Call::Log {
            a: m,
            exponent_a,
            exponent_result,
        },
        Function::Log2 => Call::Log2 {
            a: m,
            exponent_a,
            exponent_result,
        },
        Function::Mod => Call::Mod {
            a: m,
            b: second(exponent_b)?,
            exponent_a,
            exponent_b,
        },
        Function::Pow => Call::Pow {
            a: m,
            b: second(POW_EXPONENT_B)?,
            exponent_a,
            exponent_result,
        },
        Function::Sqrt => Call::Sqrt {
            a: m,
            exponent_a,
            exponent_result,
        },
    };
    Ok(call)
}

fn write_json(evaluations: &[Evaluation], output: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(evaluations).context("encode results")?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
            tracing::info!("wrote {} results to {}", evaluations.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Eval {
            function,
            a,
            b,
            exponent_a,
            exponent_b,
            exponent_result,
            shift,
        } => {
            let call = build_call(function, a, b, exponent_a, exponent_b, exponent_result, shift)?;
            tracing::debug!(?call, "evaluating");
            let evaluation = call.run().context("evaluate call")?;
            write_json(&[evaluation], None)?;
        }
        Commands::Batch { input, output } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("read {}", input.display()))?;
            let calls: Vec<Call> = serde_json::from_str(&text)
                .with_context(|| format!("parse calls from {}", input.display()))?;
            tracing::info!("evaluating {} calls", calls.len());
            let evaluations = run_batch(&calls).context("evaluate batch")?;
            write_json(&evaluations, output.as_ref())?;
        }
        Commands::Digest { expect } => {
            let digest = determinism_digest();
            println!("{}", digest);
            if let Some(expected) = expect {
                if !expected.eq_ignore_ascii_case(&digest) {
                    bail!("digest mismatch: expected {}, got {}", expected, digest);
                }
                tracing::info!("digest matches");
            }
        }
    }

    Ok(())
}
