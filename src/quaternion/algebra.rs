use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::error::{KlptError, Result};

/// The rational quaternion algebra (a, b) with i^2 = a, j^2 = b and
/// k = ij = -ji.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuaternionAlgebra {
    a: BigInt,
    b: BigInt,
}

impl QuaternionAlgebra {
    pub fn new(a: BigInt, b: BigInt) -> Result<Arc<Self>> {
        if a.is_zero() || b.is_zero() {
            return Err(KlptError::InvalidInput {
                reason: format!("structure constants must be nonzero, got ({a}, {b})"),
            });
        }
        Ok(Arc::new(Self { a, b }))
    }

    /// The algebra (-1, -p), ramified at p and infinity for p = 3 mod 4.
    pub fn from_prime(p: &BigInt) -> Arc<Self> {
        Arc::new(Self {
            a: -BigInt::one(),
            b: -p,
        })
    }

    pub fn a(&self) -> &BigInt {
        &self.a
    }

    pub fn b(&self) -> &BigInt {
        &self.b
    }

    /// The finite ramified prime p of an algebra (-1, -p).
    pub fn ramified_prime(&self) -> Option<BigInt> {
        if self.a == -BigInt::one() && self.b.is_negative() {
            Some(-&self.b)
        } else {
            None
        }
    }
}

impl fmt::Display for QuaternionAlgebra {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Quaternion Algebra ({}, {}) over Q", self.a, self.b)
    }
}

/// An element t + x*i + y*j + z*k of a quaternion algebra with exact rational
/// coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quaternion {
    algebra: Arc<QuaternionAlgebra>,
    coeffs: [BigRational; 4],
}

impl Quaternion {
    pub fn new(algebra: &Arc<QuaternionAlgebra>, coeffs: [BigRational; 4]) -> Self {
        Self {
            algebra: algebra.clone(),
            coeffs,
        }
    }

    pub fn from_integers(algebra: &Arc<QuaternionAlgebra>, coeffs: [BigInt; 4]) -> Self {
        Self::new(algebra, coeffs.map(BigRational::from_integer))
    }

    pub fn from_i64(algebra: &Arc<QuaternionAlgebra>, coeffs: [i64; 4]) -> Self {
        Self::from_integers(algebra, coeffs.map(BigInt::from))
    }

    /// The element (t + x*i + y*j + z*k) / den.
    pub fn from_i64_over(algebra: &Arc<QuaternionAlgebra>, coeffs: [i64; 4], den: i64) -> Self {
        let den = BigInt::from(den);
        Self::new(
            algebra,
            coeffs.map(|c| BigRational::new(BigInt::from(c), den.clone())),
        )
    }

    pub fn from_scalar(algebra: &Arc<QuaternionAlgebra>, c: BigRational) -> Self {
        let z = BigRational::zero();
        Self::new(algebra, [c, z.clone(), z.clone(), z])
    }

    pub fn zero(algebra: &Arc<QuaternionAlgebra>) -> Self {
        Self::from_i64(algebra, [0, 0, 0, 0])
    }

    pub fn one(algebra: &Arc<QuaternionAlgebra>) -> Self {
        Self::from_i64(algebra, [1, 0, 0, 0])
    }

    pub fn i(algebra: &Arc<QuaternionAlgebra>) -> Self {
        Self::from_i64(algebra, [0, 1, 0, 0])
    }

    pub fn j(algebra: &Arc<QuaternionAlgebra>) -> Self {
        Self::from_i64(algebra, [0, 0, 1, 0])
    }

    pub fn k(algebra: &Arc<QuaternionAlgebra>) -> Self {
        Self::from_i64(algebra, [0, 0, 0, 1])
    }

    pub fn algebra(&self) -> &Arc<QuaternionAlgebra> {
        &self.algebra
    }

    /// Coefficients (t, x, y, z) in the basis {1, i, j, k}.
    pub fn coeffs(&self) -> &[BigRational; 4] {
        &self.coeffs
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    /// Whether all four coefficients are integers.
    pub fn has_integral_coeffs(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_integer())
    }

    /// The least common multiple of the coefficient denominators.
    pub fn denominator(&self) -> BigInt {
        self.coeffs
            .iter()
            .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()))
    }

    /// Return t - x*i - y*j - z*k
    pub fn conjugate(&self) -> Self {
        let [t, x, y, z] = &self.coeffs;
        Self::new(&self.algebra, [t.clone(), -x, -y, -z])
    }

    /// Return the reduced norm t^2 - a*x^2 - b*y^2 + a*b*z^2
    pub fn reduced_norm(&self) -> BigRational {
        let [t, x, y, z] = &self.coeffs;
        let a = BigRational::from_integer(self.algebra.a.clone());
        let b = BigRational::from_integer(self.algebra.b.clone());
        t * t - &a * x * x - &b * y * y + &a * &b * z * z
    }

    /// Return the reduced trace 2t
    pub fn reduced_trace(&self) -> BigRational {
        &self.coeffs[0] * BigRational::from_integer(BigInt::from(2))
    }

    /// The bilinear form attached to the reduced norm: trd(self * conj(other)).
    pub fn norm_pairing(&self, other: &Self) -> BigRational {
        (self * &other.conjugate()).reduced_trace()
    }

    pub fn inverse(&self) -> Result<Self> {
        let n = self.reduced_norm();
        if n.is_zero() {
            return Err(KlptError::DivisionByZeroNorm);
        }
        Ok(self.conjugate().scale(&n.recip()))
    }

    /// Return self * other^-1
    pub fn right_divide(&self, other: &Self) -> Result<Self> {
        Ok(self * &other.inverse()?)
    }

    /// Multiply every coefficient by the rational c.
    pub fn scale_into(&mut self, c: &BigRational) {
        for x in self.coeffs.iter_mut() {
            *x *= c;
        }
    }

    /// Return c * self for a rational c.
    pub fn scale(&self, c: &BigRational) -> Self {
        let mut r = self.clone();
        r.scale_into(c);
        r
    }

    /// Return c * self for an integer c.
    pub fn scale_int(&self, c: &BigInt) -> Self {
        self.scale(&BigRational::from_integer(c.clone()))
    }

    fn set_neg(&mut self) {
        for x in self.coeffs.iter_mut() {
            *x = -&*x;
        }
    }

    fn set_add(&mut self, other: &Self) {
        debug_assert_eq!(self.algebra, other.algebra);
        for (x, y) in self.coeffs.iter_mut().zip(other.coeffs.iter()) {
            *x += y;
        }
    }

    fn set_sub(&mut self, other: &Self) {
        debug_assert_eq!(self.algebra, other.algebra);
        for (x, y) in self.coeffs.iter_mut().zip(other.coeffs.iter()) {
            *x -= y;
        }
    }

    /// Set self <- self * other using the structure constants (a, b).
    fn set_mul(&mut self, other: &Self) {
        debug_assert_eq!(self.algebra, other.algebra);
        let a = BigRational::from_integer(self.algebra.a.clone());
        let b = BigRational::from_integer(self.algebra.b.clone());
        let ab = &a * &b;
        let [t1, x1, y1, z1] = &self.coeffs;
        let [t2, x2, y2, z2] = &other.coeffs;

        let t = t1 * t2 + &a * x1 * x2 + &b * y1 * y2 - &ab * z1 * z2;
        let x = t1 * x2 + x1 * t2 - &b * y1 * z2 + &b * z1 * y2;
        let y = t1 * y2 + y1 * t2 + &a * x1 * z2 - &a * z1 * x2;
        let z = t1 * z2 + z1 * t2 + x1 * y2 - y1 * x2;

        self.coeffs = [t, x, y, z];
    }
}

impl Neg for &Quaternion {
    type Output = Quaternion;

    #[inline(always)]
    fn neg(self) -> Quaternion {
        let mut r = self.clone();
        r.set_neg();
        r
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    #[inline(always)]
    fn neg(mut self) -> Quaternion {
        self.set_neg();
        self
    }
}

impl Add<Quaternion> for Quaternion {
    type Output = Quaternion;

    #[inline(always)]
    fn add(mut self, other: Quaternion) -> Quaternion {
        self.set_add(&other);
        self
    }
}

impl Add<&Quaternion> for &Quaternion {
    type Output = Quaternion;

    #[inline(always)]
    fn add(self, other: &Quaternion) -> Quaternion {
        let mut r = self.clone();
        r.set_add(other);
        r
    }
}

impl AddAssign<&Quaternion> for Quaternion {
    #[inline(always)]
    fn add_assign(&mut self, other: &Quaternion) {
        self.set_add(other);
    }
}

impl Sub<Quaternion> for Quaternion {
    type Output = Quaternion;

    #[inline(always)]
    fn sub(mut self, other: Quaternion) -> Quaternion {
        self.set_sub(&other);
        self
    }
}

impl Sub<&Quaternion> for &Quaternion {
    type Output = Quaternion;

    #[inline(always)]
    fn sub(self, other: &Quaternion) -> Quaternion {
        let mut r = self.clone();
        r.set_sub(other);
        r
    }
}

impl SubAssign<&Quaternion> for Quaternion {
    #[inline(always)]
    fn sub_assign(&mut self, other: &Quaternion) {
        self.set_sub(other);
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Quaternion;

    #[inline(always)]
    fn mul(mut self, other: Quaternion) -> Quaternion {
        self.set_mul(&other);
        self
    }
}

impl Mul<&Quaternion> for &Quaternion {
    type Output = Quaternion;

    #[inline(always)]
    fn mul(self, other: &Quaternion) -> Quaternion {
        let mut r = self.clone();
        r.set_mul(other);
        r
    }
}

impl MulAssign<&Quaternion> for Quaternion {
    #[inline(always)]
    fn mul_assign(&mut self, other: &Quaternion) {
        self.set_mul(other);
    }
}

impl MulAssign<&BigRational> for Quaternion {
    #[inline(always)]
    fn mul_assign(&mut self, other: &BigRational) {
        self.scale_into(other);
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [t, x, y, z] = &self.coeffs;
        write!(f, "{} + {}*i + {}*j + {}*k", t, x, y, z)
    }
}
