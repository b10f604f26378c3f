use std::fmt;
use std::sync::{Arc, OnceLock};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::algebra::Quaternion;
use super::lattice::{canonical_basis, coordinates, lattice_contains, lll_reduce};
use super::order::Order;
use crate::error::{KlptError, Result};

/// A left ideal of an order, stored by its canonical basis.
///
/// The left order is shared with every other ideal of the same order. The
/// right order is computed on first use and cached.
#[derive(Debug, Clone)]
pub struct Ideal {
    basis: [Quaternion; 4],
    left_order: Arc<Order>,
    right_order: OnceLock<Arc<Order>>,
}

impl PartialEq for Ideal {
    fn eq(&self, other: &Self) -> bool {
        self.basis == other.basis && self.left_order == other.left_order
    }
}

impl Eq for Ideal {}

/// The gcd of a list of rationals: the largest rational g such that every
/// entry is an integer multiple of g.
fn rational_gcd<'a>(values: impl Iterator<Item = &'a BigRational> + Clone) -> BigRational {
    let den = values
        .clone()
        .fold(BigInt::one(), |acc, v| acc.lcm(v.denom()));
    let den_q = BigRational::from_integer(den.clone());
    let g = values.fold(BigInt::zero(), |acc, v| acc.gcd(&(v * &den_q).to_integer()));
    BigRational::new(g, den)
}

impl Ideal {
    pub(crate) fn from_canonical(basis: [Quaternion; 4], left_order: Arc<Order>) -> Self {
        Self {
            basis,
            left_order,
            right_order: OnceLock::new(),
        }
    }

    /// Canonicalise `gens` into an ideal of `left_order`. The caller guarantees
    /// that the lattice is a left `left_order`-module.
    fn from_lattice(gens: &[Quaternion], left_order: &Arc<Order>) -> Result<Self> {
        let basis: [Quaternion; 4] = canonical_basis(left_order.algebra(), gens)
            .try_into()
            .map_err(|_| KlptError::InvalidInput {
                reason: "generators span a lattice of rank less than 4".to_string(),
            })?;
        Ok(Self::from_canonical(basis, left_order.clone()))
    }

    pub fn basis(&self) -> &[Quaternion; 4] {
        &self.basis
    }

    pub fn left_order(&self) -> &Arc<Order> {
        &self.left_order
    }

    /// The right order {x : I x in I}, computed as conj(I) * I / N(I).
    pub fn right_order(&self) -> &Arc<Order> {
        self.right_order.get_or_init(|| {
            let n_inv = self.norm().recip();
            let products: Vec<Quaternion> = self
                .basis
                .iter()
                .flat_map(|x| {
                    let x_bar = x.conjugate();
                    let n_inv = &n_inv;
                    self.basis.iter().map(move |y| (&x_bar * y).scale(n_inv))
                })
                .collect();
            let order = Order::from_lattice(self.left_order.algebra(), &products)
                .unwrap_or_else(|| panic!("right order of {self} does not have rank 4"));
            Arc::new(order)
        })
    }

    /// The reduced norm of the ideal: the gcd of all N(x) for x in I.
    pub fn norm(&self) -> BigRational {
        let mut values: Vec<BigRational> = Vec::with_capacity(10);
        for (n, x) in self.basis.iter().enumerate() {
            values.push(x.reduced_norm());
            for y in self.basis.iter().skip(n + 1) {
                values.push(x.norm_pairing(y));
            }
        }
        rational_gcd(values.iter())
    }

    /// Return N(x) / N(I), an integer for x in I.
    pub fn normalized_norm(&self, x: &Quaternion) -> BigRational {
        x.reduced_norm() / self.norm()
    }

    pub fn contains(&self, x: &Quaternion) -> bool {
        lattice_contains(&self.basis, x)
    }

    /// Whether the ideal is contained in its left order.
    pub fn is_integral(&self) -> bool {
        self.basis.iter().all(|b| self.left_order.contains(b))
    }

    /// Coordinates of x in the canonical basis.
    pub fn coordinates(&self, x: &Quaternion) -> Option<[BigRational; 4]> {
        coordinates(&self.basis, x)
    }

    /// The ideal I * beta, with the same left order.
    pub fn scale(&self, beta: &Quaternion) -> Result<Ideal> {
        if beta.reduced_norm().is_zero() {
            return Err(KlptError::DivisionByZeroNorm);
        }
        let gens: Vec<Quaternion> = self.basis.iter().map(|b| b * beta).collect();
        Self::from_lattice(&gens, &self.left_order)
    }

    /// The ideal c * I for a nonzero rational c.
    pub fn scale_rational(&self, c: &BigRational) -> Result<Ideal> {
        self.scale(&Quaternion::from_scalar(self.left_order.algebra(), c.clone()))
    }

    /// Conjugates of the basis elements: a basis of the conjugate ideal,
    /// a left ideal of the right order.
    pub fn conjugate_basis(&self) -> [Quaternion; 4] {
        self.basis.clone().map(|b| b.conjugate())
    }

    /// An LLL-reduced basis for the reduced norm.
    pub fn reduced_basis(&self) -> Vec<Quaternion> {
        lll_reduce(&self.basis)
    }
}

impl fmt::Display for Ideal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Ideal with basis ({}, {}, {}, {})",
            self.basis[0], self.basis[1], self.basis[2], self.basis[3]
        )
    }
}

/// The left `order`-ideal generated by `gens`: the Z-span of all b * g for
/// b in the basis of the order.
pub fn left_ideal(gens: &[Quaternion], order: &Arc<Order>) -> Result<Ideal> {
    for g in gens.iter() {
        if !order.contains(g) {
            return Err(KlptError::InvalidGenerator {
                generator: g.to_string(),
            });
        }
    }

    let products: Vec<Quaternion> = order
        .basis()
        .iter()
        .flat_map(|b| gens.iter().map(move |g| b * g))
        .collect();
    let ideal = Ideal::from_lattice(&products, order)?;

    for g in gens.iter() {
        assert!(
            ideal.contains(g),
            "generator {g} missing from the ideal it generates: {ideal}"
        );
    }
    Ok(ideal)
}

/// The connecting ideal I = d * O1 * O2 with left order O1 and right order
/// O2, where d is the least integer with d * O2 inside O1.
pub fn connecting_ideal(O1: &Arc<Order>, O2: &Arc<Order>) -> Result<Ideal> {
    if O1.algebra() != O2.algebra() {
        return Err(KlptError::precondition(
            "connecting ideal needs two orders of the same algebra",
        ));
    }
    let d = O1
        .index_denominator(O2)
        .ok_or_else(|| KlptError::internal(format!("degenerate basis in {O1}")))?;

    let gens: Vec<Quaternion> = O2.basis().iter().map(|b| b.scale_int(&d)).collect();
    let I = left_ideal(&gens, O1)?;

    if I.right_order() != O2 {
        return Err(KlptError::internal(format!(
            "connecting ideal {I} of {O1} has right order {} instead of {O2}",
            I.right_order()
        )));
    }
    Ok(I)
}

/// The product I * J of an ideal with right order R and an ideal with left
/// order R.
pub fn ideal_product(I: &Ideal, J: &Ideal) -> Result<Ideal> {
    if I.right_order() != J.left_order() {
        return Err(KlptError::precondition(format!(
            "right order of {I} does not match the left order of {J}"
        )));
    }

    let O = I.left_order();
    let products: Vec<Quaternion> = I
        .basis()
        .iter()
        .flat_map(|x| J.basis().iter().map(move |y| x * y))
        .collect();

    // Clear denominators so that the generators lie in O.
    let mut d = BigInt::one();
    for x in products.iter() {
        let coords = coordinates(O.basis(), x)
            .ok_or_else(|| KlptError::internal(format!("degenerate basis in {O}")))?;
        for c in coords.iter() {
            d = d.lcm(c.denom());
        }
    }

    let gens: Vec<Quaternion> = products.iter().map(|x| x.scale_int(&d)).collect();
    let IJ = left_ideal(&gens, O)?.scale_rational(&BigRational::new(BigInt::one(), d))?;

    if IJ.right_order() != J.right_order() {
        return Err(KlptError::internal(format!(
            "product {IJ} has right order {} instead of {}",
            IJ.right_order(),
            J.right_order()
        )));
    }
    Ok(IJ)
}
