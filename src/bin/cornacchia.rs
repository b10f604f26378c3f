//! Solve x^2 + d*y^2 = m for a primitive pair (x, y).
//!
//! Usage:
//!     cornacchia 2 22

use std::process::ExitCode;

use clap::Parser;
use num_bigint::BigInt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use klpt::utilities::cornacchia::cornacchia;

#[derive(Parser, Debug)]
#[command(name = "cornacchia")]
#[command(about = "Find a primitive solution of x^2 + d*y^2 = m")]
#[command(version)]
struct Args {
    /// Coefficient d > 0
    d: BigInt,

    /// Target m > 0
    m: BigInt,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "klpt=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    match cornacchia(&args.d, &args.m) {
        Ok(Some((x, y))) => {
            println!("{x}^2 + {}*{y}^2 = {}", args.d, args.m);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("no primitive solution of x^2 + {}*y^2 = {}", args.d, args.m);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
