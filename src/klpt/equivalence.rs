use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};
use tracing::debug;

use super::Klpt;
use super::element_of_norm::element_of_norm;
use super::ideal_equation::solve_ideal_equation;
use crate::error::{KlptError, Result};
use crate::quaternion::{Ideal, Order, Quaternion, connecting_ideal, ideal_product};
use crate::utilities::arithmetic::{is_prime, power_of};
use crate::utilities::cornacchia::sum_of_two_squares;

/// Check that O lives in an algebra (-1, -p) with p = 3 mod 4 prime, that I
/// is a left O-ideal and that ell is a prime other than p. Returns p.
fn check_preconditions(I: &Ideal, O: &Arc<Order>, ell: &BigInt) -> Result<BigInt> {
    let algebra = O.algebra();
    let p = algebra.ramified_prime().ok_or_else(|| {
        KlptError::precondition(format!("{algebra} is not of the form (-1, -p)"))
    })?;
    if !is_prime(&p) || p.mod_floor(&BigInt::from(4)) != BigInt::from(3) {
        return Err(KlptError::precondition(format!(
            "ramified prime {p} must be a prime congruent to 3 mod 4"
        )));
    }
    if I.left_order() != O {
        return Err(KlptError::precondition(
            "ideal is not a left ideal of the given order",
        ));
    }
    if !is_prime(ell) || *ell == p {
        return Err(KlptError::precondition(format!(
            "ell = {ell} must be a prime different from {p}"
        )));
    }
    Ok(p)
}

/// The exponent k with N(J) = ell^k, if J is integral with such a norm.
fn ell_power_norm(J: &Ideal, ell: &BigInt) -> Option<u32> {
    let norm = J.norm();
    if !norm.is_integer() || !J.is_integral() {
        return None;
    }
    power_of(&norm.to_integer(), ell)
}

/// Whether I = O * (a + b*i) with a^2 + b^2 = N. For such an ideal every
/// solution of the ideal equation is isotropic, whatever gamma is.
fn is_gaussian_principal(I: &Ideal, N: &BigInt) -> Result<bool> {
    let Some((a, b)) = sum_of_two_squares(N)? else {
        return Ok(false);
    };
    let algebra = I.left_order().algebra();
    Ok([b.clone(), -b].into_iter().any(|b| {
        let beta = Quaternion::from_integers(algebra, [a.clone(), b, BigInt::zero(), BigInt::zero()]);
        I.contains(&beta)
    }))
}

impl Klpt {
    /// Steps 3 to 5 for I_1 = O<N, alpha> of prime norm N. Returns beta with
    /// I_1 * beta of norm a power of ell, or `None` when step 4 has no usable
    /// solution and a new step 1 ideal is needed.
    fn connect_prime_norm_ideal<R: CryptoRng + RngCore>(
        &self,
        I_1: &Ideal,
        N: &BigInt,
        O: &Arc<Order>,
        ell: &BigInt,
        rng: &mut R,
    ) -> Result<Option<Quaternion>> {
        let p = check_preconditions(I_1, O, ell)?;
        let D = O.denominator_index();

        // Smallest c with N * ell^c >= p * 2^margin
        let floor = &p << self.norm_margin_bits;
        let mut M = N.clone();
        while M < floor {
            M *= ell;
        }

        for retry in 0..=self.element_of_norm_retries {
            if retry > 0 {
                M *= ell;
            }

            let Some(gamma) = element_of_norm(&M, O)? else {
                debug!(retry, %M, "no element of norm M, raising M");
                continue;
            };

            let mu_0 = match solve_ideal_equation(&gamma, I_1, &D, N, O) {
                Ok(mu_0) => mu_0,
                Err(KlptError::NoCongruenceSolution { .. }) => {
                    debug!(%M, "ideal equation has no solution");
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };
            let [_, _, y0, z0] = mu_0.coeffs();
            if (y0 * y0 + z0 * z0).to_integer().mod_floor(N).is_zero() {
                debug!(%M, "only isotropic solutions of the ideal equation");
                return Ok(None);
            }

            let Some(mu) = self.strong_approximation(&mu_0, N, O, ell, rng)? else {
                return Err(KlptError::StrongApproximationExhausted {
                    max_exponent: self.strong_approximation_ceiling(&mu_0, N, O, ell)?,
                });
            };

            // beta = conj(gamma * mu) / N, of norm ell^(c + e) / N
            let beta = (&gamma * &mu)
                .conjugate()
                .scale(&BigRational::new(BigInt::one(), N.clone()));
            return Ok(Some(beta));
        }

        Err(KlptError::SearchExhausted {
            search: "element of norm N * ell^c",
            attempts: self.element_of_norm_retries + 1,
        })
    }

    /// KLPT for a special order O containing 1, i, j, k in the algebra
    /// (-1, -p). Returns (J, delta) with J = I * delta integral, of norm
    /// ell^k for some k >= 1, and with left order O.
    ///
    /// Step 1 is drawn again, up to `representative_retries` times, when the
    /// prime norm ideal is generated by an element of Z[i] or when step 4
    /// only has isotropic solutions for it.
    pub fn special_ell_power_equiv<R: CryptoRng + RngCore>(
        &self,
        I: &Ideal,
        O: &Arc<Order>,
        ell: &BigInt,
        rng: &mut R,
    ) -> Result<(Ideal, Quaternion)> {
        check_preconditions(I, O, ell)?;
        if !O.is_special() {
            return Err(KlptError::precondition(format!("{O} does not contain 1, i, j, k")));
        }
        let D = O.denominator_index();

        for draw in 0..=self.representative_retries {
            let (I_1, gamma_1) = self.prime_norm_representative(I, O, &D, ell, rng)?;
            let (N, _) = self.find_generators(&I_1)?;
            if is_gaussian_principal(&I_1, &N)? {
                debug!(draw, %N, "prime norm ideal is generated by a Gaussian integer, redrawing");
                continue;
            }

            let Some(beta) = self.connect_prime_norm_ideal(&I_1, &N, O, ell, rng)? else {
                debug!(draw, %N, "redrawing prime norm representative");
                continue;
            };
            let J = I_1.scale(&beta)?;
            let delta = &gamma_1 * &beta;

            if ell_power_norm(&J, ell).is_none_or(|k| k == 0) {
                return Err(KlptError::internal(format!(
                    "{J} is not an integral ideal of norm a power of {ell}"
                )));
            }
            if J != I.scale(&delta)? {
                return Err(KlptError::internal(format!(
                    "{J} is not I * delta for I = {I} and delta = {delta}"
                )));
            }

            debug!(%N, norm = %J.norm(), "found ell power equivalent ideal");
            return Ok((J, delta));
        }

        Err(KlptError::SearchExhausted {
            search: "prime norm representative with a usable ideal equation",
            attempts: self.representative_retries + 1,
        })
    }

    /// KLPT for an arbitrary maximal order O of the algebra (-1, -p).
    ///
    /// With I the connecting ideal from the special order O_0 to O and
    /// K = I * J, the special routine gives I' = I * delta_1 and
    /// K' = K * delta_2. Then J * ell^e1 * delta_2 * delta_1^-1, where
    /// N(I') = ell^e1, equals delta_1 * conj(I') * K' * delta_1^-1 and is
    /// therefore an integral left O-ideal of norm ell^(e1 + e2). Scalar
    /// factors ell are divided out while the ideal stays integral of norm
    /// greater than 1.
    pub fn ell_power_equiv<R: CryptoRng + RngCore>(
        &self,
        J: &Ideal,
        O: &Arc<Order>,
        ell: &BigInt,
        rng: &mut R,
    ) -> Result<(Ideal, Quaternion)> {
        check_preconditions(J, O, ell)?;
        let O_0 = Order::special(O.algebra())?;
        if *O == O_0 {
            return self.special_ell_power_equiv(J, &O_0, ell, rng);
        }

        let I = connecting_ideal(&O_0, O)?;
        let K = ideal_product(&I, J)?;
        let (I_1, delta_1) = self.special_ell_power_equiv(&I, &O_0, ell, rng)?;
        let (_, delta_2) = self.special_ell_power_equiv(&K, &O_0, ell, rng)?;

        let e_1 = ell_power_norm(&I_1, ell).ok_or_else(|| {
            KlptError::internal(format!("{I_1} does not have norm a power of {ell}"))
        })?;
        let ell_e1 = BigRational::from_integer(ell.pow(e_1));
        let mut delta = (&delta_2 * &delta_1.inverse()?).scale(&ell_e1);
        let mut J_ell = J.scale(&delta)?;

        // Strip scalar factors of ell.
        let ell_inv = BigRational::new(BigInt::one(), ell.clone());
        loop {
            let candidate = J_ell.scale_rational(&ell_inv)?;
            if !candidate.is_integral() || candidate.norm() <= BigRational::one() {
                break;
            }
            J_ell = candidate;
            delta = delta.scale(&ell_inv);
        }

        if J_ell.left_order() != O || ell_power_norm(&J_ell, ell).is_none_or(|k| k == 0) {
            return Err(KlptError::internal(format!(
                "{J_ell} is not an integral left ideal of {O} with norm a power of {ell}"
            )));
        }
        debug!(norm = %J_ell.norm(), "recombined ell power equivalent ideal");
        Ok((J_ell, delta))
    }
}
