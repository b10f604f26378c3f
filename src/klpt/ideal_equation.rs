use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::Zero;
use tracing::trace;

use crate::error::{KlptError, Result};
use crate::quaternion::{Ideal, Order, Quaternion};
use crate::utilities::arithmetic::inverse_mod;
use crate::utilities::gf_matrix::left_kernel;

/// The reduction O -> O / N O = GF(N)^4: coordinates in {1, i, j, k} are
/// scaled by D to clear denominators, reduced mod N and multiplied by
/// c = D^-1 mod N.
struct ResidueMap {
    D: BigRational,
    c: BigInt,
    N: BigInt,
}

impl ResidueMap {
    fn new(D: &BigInt, N: &BigInt) -> Result<Self> {
        let c = inverse_mod(D, N).ok_or_else(|| {
            KlptError::precondition(format!("index {D} is not invertible modulo {N}"))
        })?;
        Ok(Self {
            D: BigRational::from_integer(D.clone()),
            c,
            N: N.clone(),
        })
    }

    fn apply(&self, x: &Quaternion) -> Result<Vec<BigInt>> {
        x.coeffs()
            .iter()
            .map(|a| {
                let scaled = a * &self.D;
                if !scaled.is_integer() {
                    return Err(KlptError::precondition(format!(
                        "{x} has a denominator not dividing the index"
                    )));
                }
                Ok((scaled.to_integer() * &self.c).mod_floor(&self.N))
            })
            .collect()
    }
}

/// Find mu_0 = y*j + z*k, y and z in [0, N), nonzero modulo N, such that
/// gamma * mu_0 lies in I + N*O.
///
/// The condition is linear in (y, z) over GF(N): the images of gamma*j and
/// gamma*k are stacked on top of the images of the basis of I, and a vector
/// of the left kernel with a nonzero (y, z) part gives the solution. Among
/// the candidates one with N(y + z*i) nonzero modulo N is preferred, since
/// step 5 needs it.
pub fn solve_ideal_equation(
    gamma: &Quaternion,
    I: &Ideal,
    D: &BigInt,
    N: &BigInt,
    O: &Order,
) -> Result<Quaternion> {
    let algebra = O.algebra();
    let phi = ResidueMap::new(D, N)?;

    let mut rows = vec![
        phi.apply(&(gamma * &Quaternion::j(algebra)))?,
        phi.apply(&(gamma * &Quaternion::k(algebra)))?,
    ];
    for b in I.basis().iter() {
        rows.push(phi.apply(b)?);
    }

    let kernel = left_kernel(&rows, N)?;

    // Kernel vectors and their pairwise sums, restricted to the (y, z) part.
    let mut candidates: Vec<(BigInt, BigInt)> = kernel
        .iter()
        .map(|v| (v[0].clone(), v[1].clone()))
        .collect();
    for (n, u) in kernel.iter().enumerate() {
        for v in kernel.iter().skip(n + 1) {
            candidates.push(((&u[0] + &v[0]).mod_floor(N), (&u[1] + &v[1]).mod_floor(N)));
        }
    }
    candidates.retain(|(y, z)| !(y.is_zero() && z.is_zero()));

    // N(y + z*i) = y^2 - a*z^2
    let a = algebra.a();
    let is_isotropic = |(y, z): &(BigInt, BigInt)| (y * y - a * z * z).mod_floor(N).is_zero();
    let (y, z) = match candidates.iter().find(|c| !is_isotropic(*c)) {
        Some(c) => c.clone(),
        None => {
            trace!(kernel_dimension = kernel.len(), "only isotropic solutions");
            candidates
                .into_iter()
                .next()
                .ok_or_else(|| KlptError::NoCongruenceSolution { modulus: N.clone() })?
        }
    };

    Ok(Quaternion::from_integers(algebra, [BigInt::zero(), BigInt::zero(), y, z]))
}
