use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use tracing::trace;

use crate::error::{KlptError, Result};
use crate::quaternion::{Order, Quaternion};
use crate::utilities::arithmetic::is_prime;
use crate::utilities::cornacchia::cornacchia;

/// Find t + x*i + y*j + z*k of reduced norm M in the algebra (-q, -p).
///
/// The box (y, z) in [0, sqrt(M / p)]^2 is scanned row by row. For each pair
/// with r = M - p * (y^2 + q * z^2) prime, x^2 + q * x'^2 = r is solved by
/// Cornacchia. Returns `Ok(None)` when the box holds no solution, the caller
/// then retries with another M.
pub fn element_of_norm(M: &BigInt, O: &Order) -> Result<Option<Quaternion>> {
    if !M.is_positive() {
        return Err(KlptError::InvalidInput {
            reason: format!("target norm must be positive, got {M}"),
        });
    }

    let algebra = O.algebra();
    let q = -algebra.a();
    let p = -algebra.b();
    if !q.is_positive() || !p.is_positive() {
        return Err(KlptError::precondition(format!(
            "{algebra} is not a definite algebra (-q, -p)"
        )));
    }

    let bound = (M / &p).sqrt();
    let mut y = BigInt::zero();
    while y <= bound {
        let mut z = BigInt::zero();
        while z <= bound {
            let r = M - &p * (&y * &y + &q * &z * &z);
            if !r.is_positive() {
                break;
            }
            if is_prime(&r) {
                match cornacchia(&q, &r)? {
                    Some((t, x)) => {
                        let gamma = Quaternion::from_integers(algebra, [t, x, y.clone(), z.clone()]);
                        let norm = gamma.reduced_norm();
                        if !norm.is_integer() || norm.to_integer() != *M {
                            return Err(KlptError::internal(format!(
                                "element {gamma} has norm {norm} instead of {M}"
                            )));
                        }
                        return Ok(Some(gamma));
                    }
                    None => trace!(%r, "prime without a norm form solution"),
                }
            }
            z += BigInt::one();
        }
        y += BigInt::one();
    }

    Ok(None)
}
