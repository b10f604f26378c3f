//! Stress harness: run `ell_power_equiv` on random ideals of the maximal
//! order Z<(1 + j)/2, (i + k)/2, j, k> for consecutive primes p = 3 mod 4.
//!
//! Usage:
//!     klpt-stress --start 1000000000 --count 10 --ell 2

#![allow(non_snake_case)]

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::Zero;
use rand::Rng;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use klpt::error::Result;
use klpt::klpt::ell_power_equiv;
use klpt::quaternion::lattice::combination;
use klpt::quaternion::{Ideal, Order, Quaternion, QuaternionAlgebra, left_ideal};
use klpt::utilities::arithmetic::{divisors, is_prime};
use klpt::utilities::test_utils::drng::DRNG;

#[derive(Parser, Debug)]
#[command(name = "klpt-stress")]
#[command(about = "Run the KLPT ell-power equivalence over many primes")]
#[command(version)]
struct Args {
    /// Search for primes p = 3 mod 4 from this value
    #[arg(long, default_value = "1000000000")]
    start: u64,

    /// Number of primes to run
    #[arg(long, default_value_t = 10)]
    count: usize,

    /// The small prime ell of the output norm
    #[arg(long, default_value = "2")]
    ell: u64,

    /// Seed of the deterministic random generator
    #[arg(long, default_value = "klpt-stress")]
    seed: String,
}

/// Primes p = 3 mod 4 from `start` onwards.
fn primes_3_mod_4(start: u64) -> impl Iterator<Item = BigInt> {
    (start..)
        .map(BigInt::from)
        .filter(|n| n.mod_floor(&BigInt::from(4)) == BigInt::from(3) && is_prime(n))
}

/// A random ideal O<alpha, d> for alpha in O and d a divisor of N(alpha).
fn random_ideal(O: &Arc<Order>, rng: &mut DRNG) -> Result<Ideal> {
    loop {
        let coeffs: Vec<BigInt> = (0..4).map(|_| BigInt::from(rng.random_range(-10i64..=10))).collect();
        let Some(alpha) = combination(O.basis(), &coeffs) else {
            continue;
        };
        let norm = alpha.reduced_norm();
        if norm.is_zero() {
            continue;
        }

        let divs = divisors(&norm.to_integer());
        let d = &divs[rng.random_range(0..divs.len())];
        let d = Quaternion::from_scalar(O.algebra(), BigRational::from_integer(d.clone()));
        return left_ideal(&[alpha, d], O);
    }
}

/// Build the maximal order for p, draw an ideal and reduce it. Returns the
/// input and output ideals.
fn run_once(p: &BigInt, ell: &BigInt, rng: &mut DRNG) -> Result<(Ideal, Ideal)> {
    let algebra = QuaternionAlgebra::from_prime(p);
    let O = Order::standard_maximal(&algebra)?;
    let I = random_ideal(&O, rng)?;
    let (J, _) = ell_power_equiv(&I, &O, ell, rng)?;
    Ok((I, J))
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "klpt=info,klpt_stress=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let ell = BigInt::from(args.ell);
    let mut rng = DRNG::from_seed(args.seed.as_bytes());
    let mut failures = 0;

    for p in primes_3_mod_4(args.start).take(args.count) {
        let start = Instant::now();
        match run_once(&p, &ell, &mut rng) {
            Ok((I, J)) => info!(
                %p,
                input_norm = %I.norm(),
                output_norm = %J.norm(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "ell power equivalence"
            ),
            Err(e) => {
                failures += 1;
                error!(%p, error = %e, "ell power equivalence failed");
            }
        }
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
