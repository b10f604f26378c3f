use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;
use rand::Rng;
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, trace, warn};

use super::Klpt;
use crate::error::{KlptError, Result};
use crate::quaternion::lattice::{combination, is_minkowski_basis};
use crate::quaternion::{Ideal, Order, Quaternion};
use crate::utilities::arithmetic::{is_prime, legendre_symbol};

// Keeps the doubled sampling bound well inside i64.
const MAX_SAMPLING_BOUND: i64 = 1 << 40;

/// Whether q is an acceptable prime norm for step 1.
fn is_admissible_norm(q: &BigInt, D: &BigInt, ell: &BigInt, p: &BigInt) -> bool {
    if *q == BigInt::from(2) || q == ell || q == p {
        return false;
    }
    if !is_prime(q) || !q.gcd(D).is_one() {
        return false;
    }
    legendre_symbol(ell, q) == -1
}

impl Klpt {
    /// Find J = I * gamma of prime norm q, with gamma = conj(alpha) / N(I) for
    /// some alpha in I.
    ///
    /// The prime q is coprime to D, differs from ell and from the ramified
    /// prime, and ell is not a square modulo q. Elements are sampled as small
    /// random combinations of an LLL-reduced basis of I; the coefficient
    /// bound doubles every `prime_norm_widen_every` failures.
    pub fn prime_norm_representative<R: CryptoRng + RngCore>(
        &self,
        I: &Ideal,
        O: &Arc<Order>,
        D: &BigInt,
        ell: &BigInt,
        rng: &mut R,
    ) -> Result<(Ideal, Quaternion)> {
        if I.left_order() != O {
            return Err(KlptError::precondition(
                "ideal is not a left ideal of the given order",
            ));
        }
        let p = O.algebra().ramified_prime().ok_or_else(|| {
            KlptError::precondition(format!("{} is not of the form (-1, -p)", O.algebra()))
        })?;

        let basis = I.reduced_basis();
        if !is_minkowski_basis(&basis) {
            warn!("reduced basis of {I} is not Minkowski reduced, sampling may be slow");
        }

        let N_I = I.norm();
        // A zero widening period never widens.
        let mut m = self.prime_norm_initial_bound.clamp(1, MAX_SAMPLING_BOUND);
        for attempt in 0..self.prime_norm_max_attempts {
            if attempt > 0 && attempt.checked_rem(self.prime_norm_widen_every) == Some(0) {
                m = m.saturating_mul(2).min(MAX_SAMPLING_BOUND);
                debug!(attempt, bound = m, "widening prime norm sampling bound");
            }

            let coeffs: Vec<BigInt> = (0..4).map(|_| BigInt::from(rng.random_range(-m..=m))).collect();
            let Some(alpha) = combination(&basis, &coeffs) else {
                continue;
            };
            if alpha.is_zero() {
                continue;
            }

            let q = alpha.reduced_norm() / &N_I;
            if !q.is_integer() {
                return Err(KlptError::internal(format!(
                    "element {alpha} of {I} has non-integral normalized norm {q}"
                )));
            }
            let q = q.to_integer();
            if !is_admissible_norm(&q, D, ell, &p) {
                trace!(%q, "rejected normalized norm");
                continue;
            }

            let gamma = alpha.conjugate().scale(&N_I.recip());
            let J = I.scale(&gamma)?;

            let N_J = J.norm();
            if !N_J.is_integer() || N_J.to_integer() != q {
                return Err(KlptError::internal(format!(
                    "I * gamma has norm {N_J}, expected {q}, with I = {I} and gamma = {gamma}"
                )));
            }
            debug!(attempt, %q, "found prime norm representative");
            return Ok((J, gamma));
        }

        Err(KlptError::SearchExhausted {
            search: "prime norm representative",
            attempts: self.prime_norm_max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn admissible_norms() {
        let D = BigInt::from(2);
        let ell = BigInt::from(3);
        let p = BigInt::from(59);
        // 3 is a non-residue mod 5 and 7, a residue mod 11 and 13.
        assert!(is_admissible_norm(&BigInt::from(5), &D, &ell, &p));
        assert!(is_admissible_norm(&BigInt::from(7), &D, &ell, &p));
        assert!(!is_admissible_norm(&BigInt::from(11), &D, &ell, &p));
        assert!(!is_admissible_norm(&BigInt::from(13), &D, &ell, &p));
        assert!(!is_admissible_norm(&BigInt::from(2), &D, &ell, &p));
        assert!(!is_admissible_norm(&BigInt::from(3), &D, &ell, &p));
        assert!(!is_admissible_norm(&BigInt::from(59), &D, &ell, &p));
        assert!(!is_admissible_norm(&BigInt::from(15), &D, &ell, &p));
        assert!(!is_admissible_norm(&BigInt::zero(), &D, &ell, &p));
    }
}
