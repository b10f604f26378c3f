use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::Zero;
use tracing::debug;

use super::Klpt;
use crate::error::{KlptError, Result};
use crate::quaternion::lattice::combination;
use crate::quaternion::{Ideal, Quaternion, left_ideal};

/// All coefficient vectors in [-r, r]^4 with max |c_i| == r.
fn shell(r: i64) -> impl Iterator<Item = [i64; 4]> {
    let side = 2 * r + 1;
    (0..side.pow(4)).filter_map(move |mut n| {
        let mut c = [0i64; 4];
        for ci in c.iter_mut() {
            *ci = n % side - r;
            n /= side;
        }
        c.iter().any(|ci| ci.abs() == r).then_some(c)
    })
}

impl Klpt {
    /// Find alpha in I with gcd(N(alpha), N^2) = N, where N = N(I), so that
    /// I = O<N, alpha>. The search runs over growing shells of small
    /// combinations of an LLL-reduced basis.
    pub fn find_generators(&self, I: &Ideal) -> Result<(BigInt, Quaternion)> {
        let N_I = I.norm();
        if !N_I.is_integer() {
            return Err(KlptError::precondition(format!(
                "ideal norm {N_I} is not an integer"
            )));
        }
        let N = N_I.to_integer();
        let N_squared = &N * &N;
        let basis = I.reduced_basis();

        let mut tried = 0;
        for r in 1..=self.generator_search_bound {
            for c in shell(r) {
                tried += 1;
                let coeffs = c.map(BigInt::from);
                let Some(alpha) = combination(&basis, &coeffs) else {
                    continue;
                };
                let norm = alpha.reduced_norm();
                if norm.is_zero() || !norm.is_integer() {
                    continue;
                }
                if norm.to_integer().gcd(&N_squared) != N {
                    continue;
                }

                let O = I.left_order();
                let generators = [
                    Quaternion::from_scalar(O.algebra(), BigRational::from_integer(N.clone())),
                    alpha.clone(),
                ];
                let J = left_ideal(&generators, O)?;
                if J != *I {
                    return Err(KlptError::GeneratorSearchInconsistent {
                        norm: N,
                        alpha: alpha.to_string(),
                        ideal: I.to_string(),
                    });
                }

                debug!(tried, %alpha, "found ideal generators");
                return Ok((N, alpha));
            }
        }

        Err(KlptError::SearchExhausted {
            search: "ideal generators",
            attempts: tried,
        })
    }
}
