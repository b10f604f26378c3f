use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, trace};

use super::Klpt;
use crate::error::{KlptError, Result};
use crate::quaternion::{Order, Quaternion};
use crate::utilities::arithmetic::{
    balanced_mod, inverse_mod, is_prime, legendre_symbol, sqrt_mod_prime,
};
use crate::utilities::cornacchia::sum_of_two_squares;
use crate::utilities::random::random_below;

/// Validated inputs of step 5 for mu_0 = y0*j + z0*k in the algebra (-1, -p).
struct Lift {
    p: BigInt,
    y0: BigInt,
    z0: BigInt,
    /// (p * (y0^2 + z0^2))^-1 mod N
    inv_norm: BigInt,
    first_exponent: u32,
}

impl Lift {
    fn new(mu_0: &Quaternion, N: &BigInt, O: &Order, ell: &BigInt) -> Result<Self> {
        let algebra = O.algebra();
        let p = algebra.ramified_prime().ok_or_else(|| {
            KlptError::precondition(format!("{algebra} is not of the form (-1, -p)"))
        })?;
        if !is_prime(N) || *N == BigInt::from(2) || *N == p {
            return Err(KlptError::precondition(format!(
                "modulus {N} must be an odd prime different from {p}"
            )));
        }

        let [t, x, y, z] = mu_0.coeffs();
        if !t.is_zero() || !x.is_zero() || !y.is_integer() || !z.is_integer() {
            return Err(KlptError::precondition(format!(
                "{mu_0} is not an integral element of R*j"
            )));
        }
        let y0 = y.to_integer();
        let z0 = z.to_integer();

        // p * N(beta_0) with beta_0 = y0 + z0*i
        let norm = (&p * (&y0 * &y0 + &z0 * &z0)).mod_floor(N);
        let inv_norm = inverse_mod(&norm, N).ok_or_else(|| {
            KlptError::precondition(format!("N(y0 + z0*i) vanishes modulo {N} for {mu_0}"))
        })?;

        // ell^e / (p * N(beta_0)) must be a square mod N.
        let odd = if legendre_symbol(&norm, N) == 1 {
            false
        } else if legendre_symbol(ell, N) == -1 {
            true
        } else {
            return Err(KlptError::precondition(format!(
                "no power of {ell} matches the quadratic character of {norm} modulo {N}"
            )));
        };

        // With |Y|, |Z| <= (N^2 + N) / 2 any exponent with
        // ell^e > p * (N^2 + N)^2 leaves a positive remainder.
        let size = &p * (N * N + N).pow(2);
        let mut first_exponent = if odd { 1 } else { 2 };
        let mut ell_e = ell.pow(first_exponent);
        let ell_squared = ell * ell;
        while ell_e <= size {
            ell_e *= &ell_squared;
            first_exponent += 2;
        }

        Ok(Self {
            p,
            y0,
            z0,
            inv_norm,
            first_exponent,
        })
    }
}

impl Klpt {
    /// The exponent at which step 5 gives up for these inputs.
    pub(crate) fn strong_approximation_ceiling(
        &self,
        mu_0: &Quaternion,
        N: &BigInt,
        O: &Order,
        ell: &BigInt,
    ) -> Result<u32> {
        let lift = Lift::new(mu_0, N, O, ell)?;
        Ok(lift.first_exponent + self.strong_approximation_headroom)
    }

    /// Lift mu_0 = y0*j + z0*k to mu = lambda*mu_0 + N*mu_1 of reduced norm
    /// exactly ell^e.
    ///
    /// For each exponent lambda is a square root of ell^e / (p * N(y0 + z0*i))
    /// mod N. The j and k parts of mu_1 solve a linear congruence with one
    /// coordinate drawn at random, which leaves
    /// r = (ell^e - p * (Y^2 + Z^2)) / N^2 for the 1 and i parts. When r is a
    /// prime sum of two squares the lift is complete. After
    /// `strong_approximation_attempts` failures the exponent grows by 2, and
    /// past the ceiling `Ok(None)` is returned.
    pub fn strong_approximation<R: CryptoRng + RngCore>(
        &self,
        mu_0: &Quaternion,
        N: &BigInt,
        O: &Arc<Order>,
        ell: &BigInt,
        rng: &mut R,
    ) -> Result<Option<Quaternion>> {
        let Lift {
            p,
            y0,
            z0,
            inv_norm,
            first_exponent,
        } = Lift::new(mu_0, N, O, ell)?;
        let max_exponent = first_exponent + self.strong_approximation_headroom;
        let two_p: BigInt = &p * 2;
        let N_squared = N * N;

        let mut e = first_exponent;
        while e <= max_exponent {
            let ell_e = ell.pow(e);
            let lambda = sqrt_mod_prime(&(&ell_e * &inv_norm), N).ok_or_else(|| {
                KlptError::internal(format!("{ell}^{e} has no admissible square root modulo {N}"))
            })?;

            let A = balanced_mod(&(&lambda * &y0), N);
            let B = balanced_mod(&(&lambda * &z0), N);
            let (c0, rem) = (&ell_e - &p * (&A * &A + &B * &B)).div_rem(N);
            if !rem.is_zero() {
                return Err(KlptError::internal(format!(
                    "lambda = {lambda} does not lift mu_0 = {mu_0} modulo {N}"
                )));
            }

            // Solve 2p * (A*y1 + B*z1) = c0 mod N for the coordinate whose
            // coefficient is invertible.
            let y_is_solved = !A.mod_floor(N).is_zero();
            let (pivot, other) = if y_is_solved { (&A, &B) } else { (&B, &A) };
            let pivot_inv = inverse_mod(&(&two_p * pivot), N)
                .ok_or_else(|| KlptError::internal(format!("lambda * mu_0 vanishes modulo {N}")))?;

            for _ in 0..self.strong_approximation_attempts {
                let free = random_below(rng, N);
                let solved = ((&c0 - &two_p * other * &free) * &pivot_inv).mod_floor(N);
                let (y1, z1) = if y_is_solved {
                    (solved, free)
                } else {
                    (free, solved)
                };

                let Y = &A + N * balanced_mod(&y1, N);
                let Z = &B + N * balanced_mod(&z1, N);
                let (r, rem) = (&ell_e - &p * (&Y * &Y + &Z * &Z)).div_rem(&N_squared);
                if !rem.is_zero() {
                    return Err(KlptError::internal(format!(
                        "({y1}, {z1}) does not solve the linear congruence modulo {N}"
                    )));
                }

                if !is_prime(&r) {
                    trace!(e, "remainder is not prime");
                    continue;
                }
                let Some((t1, x1)) = sum_of_two_squares(&r)? else {
                    trace!(e, %r, "prime remainder is not a sum of two squares");
                    continue;
                };

                let mu = Quaternion::from_integers(O.algebra(), [N * t1, N * x1, Y, Z]);
                let norm = mu.reduced_norm();
                if !norm.is_integer() || norm.to_integer() != ell_e {
                    return Err(KlptError::internal(format!(
                        "lifted element {mu} has norm {norm} instead of {ell}^{e}"
                    )));
                }
                debug!(e, "strong approximation succeeded");
                return Ok(Some(mu));
            }

            debug!(e, "raising strong approximation exponent");
            e += 2;
        }

        debug!(max_exponent, "strong approximation exhausted");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quaternion::QuaternionAlgebra;
    use num_traits::One;

    #[test]
    fn exponent_clears_the_remainder_bound() {
        let p = BigInt::from(59);
        let algebra = QuaternionAlgebra::from_prime(&p);
        let O = Order::special(&algebra).unwrap();
        let N = BigInt::from(101);
        let ell = BigInt::from(3);
        let mu_0 = Quaternion::from_i64(&algebra, [0, 0, 1, 0]);

        let lift = Lift::new(&mu_0, &N, &O, &ell).unwrap();
        let size = &p * (&N * &N + &N).pow(2);
        assert!(ell.pow(lift.first_exponent) > size);
        assert!(ell.pow(lift.first_exponent - 2) <= size);
        assert!((&lift.inv_norm * &p).mod_floor(&N).is_one());
    }
}
