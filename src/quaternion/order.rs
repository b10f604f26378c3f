use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;

use super::algebra::{Quaternion, QuaternionAlgebra};
use super::ideal::Ideal;
use super::lattice::{canonical_basis, coordinates, lattice_contains, lattice_contains_all};
use crate::error::{KlptError, Result};

/// An order of a quaternion algebra: a rank 4 lattice containing 1 and
/// closed under multiplication. The basis is kept in canonical form so that
/// equality of orders is equality of bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    algebra: Arc<QuaternionAlgebra>,
    basis: [Quaternion; 4],
}

impl Order {
    /// Build the order spanned by `gens`, checking that the lattice has full
    /// rank, contains 1 and is closed under multiplication.
    pub fn new(algebra: &Arc<QuaternionAlgebra>, gens: &[Quaternion]) -> Result<Arc<Self>> {
        let order = Self::from_lattice(algebra, gens).ok_or(KlptError::InvalidOrder {
            reason: "generators do not span a rank 4 lattice",
        })?;

        if !order.contains(&Quaternion::one(algebra)) {
            return Err(KlptError::InvalidOrder {
                reason: "lattice does not contain 1",
            });
        }
        for x in order.basis.iter() {
            for y in order.basis.iter() {
                if !order.contains(&(x * y)) {
                    return Err(KlptError::InvalidOrder {
                        reason: "lattice is not closed under multiplication",
                    });
                }
            }
        }

        Ok(Arc::new(order))
    }

    /// Canonical lattice without the ring checks, used where the lattice is
    /// an order by construction.
    pub(crate) fn from_lattice(algebra: &Arc<QuaternionAlgebra>, gens: &[Quaternion]) -> Option<Self> {
        let basis: [Quaternion; 4] = canonical_basis(algebra, gens).try_into().ok()?;
        Some(Self {
            algebra: algebra.clone(),
            basis,
        })
    }

    /// The order Z<1, i, (i + j)/2, (1 + k)/2> of the algebra (-1, -p),
    /// p = 3 mod 4, containing the Gaussian integers Z[i].
    pub fn special(algebra: &Arc<QuaternionAlgebra>) -> Result<Arc<Self>> {
        let gens = [
            Quaternion::from_i64(algebra, [1, 0, 0, 0]),
            Quaternion::from_i64(algebra, [0, 1, 0, 0]),
            Quaternion::from_i64_over(algebra, [0, 1, 1, 0], 2),
            Quaternion::from_i64_over(algebra, [1, 0, 0, 1], 2),
        ];
        Self::new(algebra, &gens)
    }

    /// The maximal order Z<(1 + j)/2, (i + k)/2, j, k> of the algebra
    /// (-1, -p), p = 3 mod 4.
    pub fn standard_maximal(algebra: &Arc<QuaternionAlgebra>) -> Result<Arc<Self>> {
        let gens = [
            Quaternion::from_i64_over(algebra, [1, 0, 1, 0], 2),
            Quaternion::from_i64_over(algebra, [0, 1, 0, 1], 2),
            Quaternion::from_i64(algebra, [0, 0, 1, 0]),
            Quaternion::from_i64(algebra, [0, 0, 0, 1]),
        ];
        Self::new(algebra, &gens)
    }

    pub fn algebra(&self) -> &Arc<QuaternionAlgebra> {
        &self.algebra
    }

    pub fn basis(&self) -> &[Quaternion; 4] {
        &self.basis
    }

    pub fn contains(&self, x: &Quaternion) -> bool {
        lattice_contains(&self.basis, x)
    }

    /// Whether `other` is a suborder (as a lattice) of self.
    pub fn contains_order(&self, other: &Order) -> bool {
        lattice_contains_all(&self.basis, &other.basis)
    }

    /// Whether the order contains the standard basis 1, i, j, k of an algebra
    /// with i^2 = -1.
    pub fn is_special(&self) -> bool {
        if *self.algebra.a() != -BigInt::one() {
            return false;
        }
        [
            Quaternion::one(&self.algebra),
            Quaternion::i(&self.algebra),
            Quaternion::j(&self.algebra),
            Quaternion::k(&self.algebra),
        ]
        .iter()
        .all(|x| self.contains(x))
    }

    /// The least D with D * O inside Z<1, i, j, k>.
    pub fn denominator_index(&self) -> BigInt {
        self.basis
            .iter()
            .fold(BigInt::one(), |acc, b| acc.lcm(&b.denominator()))
    }

    /// The least positive integer d with d * other inside self.
    pub fn index_denominator(&self, other: &Order) -> Option<BigInt> {
        let mut d = BigInt::one();
        for b in other.basis.iter() {
            let coords = coordinates(&self.basis, b)?;
            for c in coords.iter() {
                d = d.lcm(c.denom());
            }
        }
        Some(d)
    }

    /// The order as a left ideal of itself.
    pub fn unit_ideal(self: &Arc<Self>) -> Ideal {
        Ideal::from_canonical(self.basis.clone(), self.clone())
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Order with basis ({}, {}, {}, {})",
            self.basis[0], self.basis[1], self.basis[2], self.basis[3]
        )
    }
}
