//! The KLPT reduction: given a left ideal of a maximal order, find an
//! equivalent ideal whose norm is a power of a small prime ell.
//!
//! The special-order routine chains five steps:
//!
//! 1. `prime_norm_representative`: move to an equivalent ideal of prime norm N.
//! 2. `find_generators`: write that ideal as O<N, alpha>.
//! 3. `element_of_norm`: find gamma in O of norm N * ell^c.
//! 4. `solve_ideal_equation`: find mu_0 in Rj with gamma * mu_0 in I mod N.
//! 5. `strong_approximation`: lift mu_0 to mu of norm ell^e.
//!
//! General maximal orders are handled by `ell_power_equiv` through the
//! connecting ideal to the special order.

use std::sync::Arc;

use num_bigint::BigInt;
use rand_core::{CryptoRng, RngCore};

use crate::error::{KlptError, Result};
use crate::quaternion::{Ideal, Order, Quaternion};

mod element_of_norm;
mod equivalence;
mod generators;
mod ideal_equation;
pub mod parameters;
mod prime_norm;
mod strong_approximation;

pub use parameters::{KLPT_DEFAULT, KLPT_DEFAULT_PARAMETERS};

/// Search bounds and give-up ceilings of the randomised steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KlptParameters {
    /// Initial coefficient bound when sampling elements of the ideal in step 1.
    pub prime_norm_initial_bound: i64,
    /// Number of failed samples after which the step 1 bound doubles.
    pub prime_norm_widen_every: usize,
    pub prime_norm_max_attempts: usize,
    /// Coefficient box searched for the second generator in step 2.
    pub generator_search_bound: i64,
    /// The step 3 norm N * ell^c is taken just above p * 2^norm_margin_bits.
    pub norm_margin_bits: u32,
    /// How many times c may grow when step 3 comes back empty.
    pub element_of_norm_retries: usize,
    /// Fresh step 1 draws allowed after step 4 only yields isotropic or no
    /// solutions for the current prime norm ideal.
    pub representative_retries: usize,
    /// Samples per exponent in step 5 before the exponent grows by 2.
    pub strong_approximation_attempts: usize,
    /// Step 5 gives up past the initial exponent plus this headroom.
    pub strong_approximation_headroom: u32,
}

/// The KLPT engine, holding the search parameters.
#[derive(Clone, Copy, Debug)]
pub struct Klpt {
    prime_norm_initial_bound: i64,
    prime_norm_widen_every: usize,
    prime_norm_max_attempts: usize,
    generator_search_bound: i64,
    norm_margin_bits: u32,
    element_of_norm_retries: usize,
    representative_retries: usize,
    strong_approximation_attempts: usize,
    strong_approximation_headroom: u32,
}

impl Klpt {
    pub const fn new(params: &KlptParameters) -> Self {
        Self {
            prime_norm_initial_bound: params.prime_norm_initial_bound,
            prime_norm_widen_every: params.prime_norm_widen_every,
            prime_norm_max_attempts: params.prime_norm_max_attempts,
            generator_search_bound: params.generator_search_bound,
            norm_margin_bits: params.norm_margin_bits,
            element_of_norm_retries: params.element_of_norm_retries,
            representative_retries: params.representative_retries,
            strong_approximation_attempts: params.strong_approximation_attempts,
            strong_approximation_headroom: params.strong_approximation_headroom,
        }
    }

    /// As `new`, but rejects sampling bounds and per-step attempt counts
    /// that are not positive.
    pub fn try_new(params: &KlptParameters) -> Result<Self> {
        let checks = [
            ("prime_norm_initial_bound", params.prime_norm_initial_bound > 0),
            ("prime_norm_widen_every", params.prime_norm_widen_every > 0),
            ("prime_norm_max_attempts", params.prime_norm_max_attempts > 0),
            ("generator_search_bound", params.generator_search_bound > 0),
            ("strong_approximation_attempts", params.strong_approximation_attempts > 0),
        ];
        if let Some((name, _)) = checks.iter().find(|(_, ok)| !ok) {
            return Err(KlptError::InvalidInput {
                reason: format!("parameter {name} must be positive"),
            });
        }
        Ok(Self::new(params))
    }
}

/// Return (J, delta) with J = I * delta a left O-ideal of norm a power of
/// ell, for any maximal order O of the algebra (-1, -p), p = 3 mod 4.
pub fn ell_power_equiv<R: CryptoRng + RngCore>(
    I: &Ideal,
    O: &Arc<Order>,
    ell: &BigInt,
    rng: &mut R,
) -> Result<(Ideal, Quaternion)> {
    KLPT_DEFAULT.ell_power_equiv(I, O, ell, rng)
}

/// As `ell_power_equiv`, for a special order O containing 1, i, j, k.
pub fn special_ell_power_equiv<R: CryptoRng + RngCore>(
    I: &Ideal,
    O: &Arc<Order>,
    ell: &BigInt,
    rng: &mut R,
) -> Result<(Ideal, Quaternion)> {
    KLPT_DEFAULT.special_ell_power_equiv(I, O, ell, rng)
}

/// Step 1 with the default parameters, returning (J, gamma) with J = I * gamma
/// of prime norm.
pub fn prime_norm_representative<R: CryptoRng + RngCore>(
    I: &Ideal,
    O: &Arc<Order>,
    D: &BigInt,
    ell: &BigInt,
    rng: &mut R,
) -> Result<(Ideal, Quaternion)> {
    KLPT_DEFAULT.prime_norm_representative(I, O, D, ell, rng)
}

/// Step 2 with the default parameters, returning (N, alpha) with
/// I = O<N, alpha>.
pub fn find_generators(I: &Ideal) -> Result<(BigInt, Quaternion)> {
    KLPT_DEFAULT.find_generators(I)
}

pub use element_of_norm::element_of_norm;
pub use ideal_equation::solve_ideal_equation;

/// Step 5 with the default parameters.
pub fn strong_approximation<R: CryptoRng + RngCore>(
    mu_0: &Quaternion,
    N: &BigInt,
    O: &Arc<Order>,
    ell: &BigInt,
    rng: &mut R,
) -> Result<Option<Quaternion>> {
    KLPT_DEFAULT.strong_approximation(mu_0, N, O, ell, rng)
}
