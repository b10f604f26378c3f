#![allow(non_snake_case)]

#[cfg(test)]
mod test_quaternion {
    use klpt::error::KlptError;
    use klpt::quaternion::{Quaternion, QuaternionAlgebra};
    use klpt::utilities::test_utils::drng::DRNG;
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use num_traits::{One, Zero};
    use rand::Rng;
    use std::sync::Arc;

    fn random_element(algebra: &Arc<QuaternionAlgebra>, rng: &mut DRNG) -> Quaternion {
        let coeffs = [0; 4].map(|_: i64| rng.random_range(-50..=50));
        let den = rng.random_range(1..=6);
        Quaternion::from_i64_over(algebra, coeffs, den)
    }

    #[test]
    fn test_multiplication_table() {
        let algebra = QuaternionAlgebra::from_prime(&BigInt::from(59));
        let one = Quaternion::one(&algebra);
        let i = Quaternion::i(&algebra);
        let j = Quaternion::j(&algebra);
        let k = Quaternion::k(&algebra);

        assert_eq!(&i * &i, -one.clone());
        assert_eq!(&j * &j, Quaternion::from_i64(&algebra, [-59, 0, 0, 0]));
        assert_eq!(&k * &k, Quaternion::from_i64(&algebra, [-59, 0, 0, 0]));
        assert_eq!(&i * &j, k);
        assert_eq!(&j * &i, -k.clone());
        assert_eq!(&j * &k, Quaternion::from_i64(&algebra, [0, 59, 0, 0]));
        assert_eq!(&k * &i, j);
        assert_eq!(&one * &k, k);
    }

    #[test]
    fn test_ring_axioms() {
        let algebra = QuaternionAlgebra::from_prime(&BigInt::from(103));
        let mut rng = DRNG::from_seed("quaternion_ring_axioms".as_bytes());

        for _ in 0..50 {
            let x = random_element(&algebra, &mut rng);
            let y = random_element(&algebra, &mut rng);
            let z = random_element(&algebra, &mut rng);

            assert_eq!(&(&x * &y) * &z, &x * &(&y * &z));
            assert_eq!(&x * &(&y + &z), &(&x * &y) + &(&x * &z));
            assert_eq!(&(&x - &y) + &y, x);

            let mut w = x.clone();
            w *= &y;
            assert_eq!(w, &x * &y);
            w -= &(&x * &y);
            assert!(w.is_zero());
        }
    }

    #[test]
    fn test_norm_and_trace() {
        let algebra = QuaternionAlgebra::from_prime(&BigInt::from(59));
        let mut rng = DRNG::from_seed("quaternion_norm_and_trace".as_bytes());

        // N(1 + 2j) = 1 + 4 * 59
        let x = Quaternion::from_i64(&algebra, [1, 0, 2, 0]);
        assert_eq!(x.reduced_norm(), BigRational::from_integer(BigInt::from(237)));
        assert_eq!(x.reduced_trace(), BigRational::from_integer(BigInt::from(2)));

        for _ in 0..50 {
            let x = random_element(&algebra, &mut rng);
            let y = random_element(&algebra, &mut rng);

            assert_eq!((&x * &y).reduced_norm(), x.reduced_norm() * y.reduced_norm());
            assert_eq!(&x * &x.conjugate(), Quaternion::from_scalar(&algebra, x.reduced_norm()));
            assert_eq!(&x + &x.conjugate(), Quaternion::from_scalar(&algebra, x.reduced_trace()));
            assert_eq!((&x * &y).conjugate(), &y.conjugate() * &x.conjugate());
        }
    }

    #[test]
    fn test_inverse() {
        let algebra = QuaternionAlgebra::from_prime(&BigInt::from(59));
        let mut rng = DRNG::from_seed("quaternion_inverse".as_bytes());
        let one = Quaternion::one(&algebra);

        for _ in 0..50 {
            let x = random_element(&algebra, &mut rng);
            if x.is_zero() {
                continue;
            }
            let x_inv = x.inverse().unwrap();
            assert_eq!(&x * &x_inv, one);
            assert_eq!(&x_inv * &x, one);

            let y = random_element(&algebra, &mut rng);
            assert_eq!(&y.right_divide(&x).unwrap() * &x, y);
        }

        let zero = Quaternion::zero(&algebra);
        assert_eq!(zero.inverse(), Err(KlptError::DivisionByZeroNorm));
        assert_eq!(one.right_divide(&zero), Err(KlptError::DivisionByZeroNorm));
    }

    #[test]
    fn test_scaling_and_denominators() {
        let algebra = QuaternionAlgebra::from_prime(&BigInt::from(59));
        let x = Quaternion::from_i64_over(&algebra, [1, 0, 0, 1], 2);

        assert!(!x.has_integral_coeffs());
        assert_eq!(x.denominator(), BigInt::from(2));
        assert_eq!(x.scale_int(&BigInt::from(2)), Quaternion::from_i64(&algebra, [1, 0, 0, 1]));

        let half = BigRational::new(BigInt::one(), BigInt::from(2));
        let mut y = Quaternion::from_i64(&algebra, [1, 0, 0, 1]);
        y *= &half;
        assert_eq!(y, x);
        assert!(Quaternion::zero(&algebra).reduced_norm().is_zero());
    }

    #[test]
    fn test_algebra_construction() {
        let algebra = QuaternionAlgebra::from_prime(&BigInt::from(59));
        assert_eq!(algebra.a(), &BigInt::from(-1));
        assert_eq!(algebra.b(), &BigInt::from(-59));
        assert_eq!(algebra.ramified_prime(), Some(BigInt::from(59)));

        let other = QuaternionAlgebra::new(BigInt::from(-2), BigInt::from(-5)).unwrap();
        assert_eq!(other.ramified_prime(), None);
        assert!(QuaternionAlgebra::new(BigInt::zero(), BigInt::from(-5)).is_err());
    }
}
