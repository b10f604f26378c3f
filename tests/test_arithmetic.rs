#![allow(non_snake_case)]

#[cfg(test)]
mod test_arithmetic {
    use klpt::utilities::arithmetic::{
        balanced_mod, crt, divisors, factor, integer_sqrt_exact, inverse_mod, is_prime,
        jacobi_symbol, legendre_symbol, power_of, sqrt_mod, sqrt_mod_prime, valuation,
    };
    use klpt::utilities::gf_matrix::{left_kernel, vector_matrix_product};
    use klpt::utilities::random::{random_below, random_in_range};
    use klpt::utilities::test_utils::drng::DRNG;
    use num_bigint::BigInt;
    use num_integer::Integer;
    use num_traits::Zero;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_primality() {
        for p in [2, 3, 5, 59, 97, 101, 1019, 1_000_000_007] {
            assert!(is_prime(&big(p)), "{p} is prime");
        }
        // 561 is a Carmichael number, 3215031751 a strong pseudoprime to
        // the bases 2, 3, 5 and 7.
        for n in [0, 1, 4, 91, 561, 1_000_000_005, 3_215_031_751] {
            assert!(!is_prime(&big(n)), "{n} is composite");
        }
        assert!(!is_prime(&big(-7)));

        let mersenne: BigInt = (BigInt::from(1) << 61) - 1;
        assert!(is_prime(&mersenne));
        let fermat: BigInt = (BigInt::from(1) << 64) + 1;
        assert!(!is_prime(&fermat));
    }

    #[test]
    fn test_quadratic_symbols() {
        assert_eq!(legendre_symbol(&big(2), &big(7)), 1);
        assert_eq!(legendre_symbol(&big(3), &big(7)), -1);
        assert_eq!(legendre_symbol(&big(14), &big(7)), 0);
        assert_eq!(legendre_symbol(&big(-1), &big(13)), 1);
        assert_eq!(legendre_symbol(&big(-1), &big(59)), -1);
        // (2 / 15) = (2 / 3)(2 / 5)
        assert_eq!(jacobi_symbol(&big(2), &big(15)), 1);
        assert_eq!(jacobi_symbol(&big(7), &big(15)), -1);
    }

    #[test]
    fn test_modular_helpers() {
        assert_eq!(inverse_mod(&big(3), &big(7)), Some(big(5)));
        assert_eq!(inverse_mod(&big(-3), &big(7)), Some(big(2)));
        assert_eq!(inverse_mod(&big(2), &big(4)), None);

        assert_eq!(balanced_mod(&big(7), &big(10)), big(-3));
        assert_eq!(balanced_mod(&big(5), &big(10)), big(5));
        assert_eq!(balanced_mod(&big(-6), &big(10)), big(4));
        assert_eq!(balanced_mod(&big(-1), &big(7)), big(-1));

        assert_eq!(crt(&big(2), &big(3), &big(3), &big(5)), Some(big(8)));
        assert_eq!(crt(&big(1), &big(4), &big(3), &big(6)), None);

        assert_eq!(valuation(&big(72), &big(2)), 3);
        assert_eq!(valuation(&big(-81), &big(3)), 4);
        assert_eq!(power_of(&big(81), &big(3)), Some(4));
        assert_eq!(power_of(&big(1), &big(3)), Some(0));
        assert_eq!(power_of(&big(18), &big(3)), None);
        assert_eq!(power_of(&big(0), &big(3)), None);

        assert_eq!(integer_sqrt_exact(&big(144)), Some(big(12)));
        assert_eq!(integer_sqrt_exact(&big(145)), None);
        assert_eq!(integer_sqrt_exact(&big(-4)), None);
    }

    #[test]
    fn test_square_roots_modulo_primes() {
        for p in [3, 7, 13, 17, 41, 59, 97, 101, 1019, 65537] {
            let p = big(p);
            for a in 1..40 {
                let a = big(a).mod_floor(&p);
                let root = sqrt_mod_prime(&a, &p);
                match legendre_symbol(&a, &p) {
                    -1 => assert_eq!(root, None),
                    _ => {
                        let r = root.unwrap();
                        assert_eq!((&r * &r).mod_floor(&p), a);
                    }
                }
            }
        }
    }

    #[test]
    fn test_square_roots_modulo_composites() {
        let cases = [(20, 22), (64, 65), (17, 64), (4, 32), (9, 27), (1, 8), (0, 12), (49, 1000)];
        for (a, m) in cases {
            let (a, m) = (big(a), big(m));
            let r = sqrt_mod(&a, &m).unwrap_or_else(|| panic!("{a} is a square mod {m}"));
            assert_eq!((&r * &r - &a).mod_floor(&m), BigInt::zero());
        }

        for (a, m) in [(3, 8), (2, 9), (5, 64), (2, 27)] {
            assert_eq!(sqrt_mod(&big(a), &big(m)), None);
        }
    }

    #[test]
    fn test_factor_and_divisors() {
        assert_eq!(factor(&big(360)), vec![(big(2), 3), (big(3), 2), (big(5), 1)]);
        assert_eq!(factor(&big(1)), vec![]);

        let p = big(1_000_000_007);
        let q = big(998_244_353);
        assert_eq!(factor(&(&p * &q)), vec![(q.clone(), 1), (p.clone(), 1)]);
        assert_eq!(factor(&(&p * &p * &q)), vec![(q, 1), (p, 2)]);

        let divs: Vec<BigInt> = [1, 2, 3, 4, 6, 12].into_iter().map(big).collect();
        assert_eq!(divisors(&big(12)), divs);
        assert_eq!(divisors(&big(-12)), divs);
    }

    #[test]
    fn test_left_kernel() {
        let n = big(101);
        let rows: Vec<Vec<BigInt>> = [[1, 2, 3], [2, 4, 6], [0, 1, 1], [5, 3, 8]]
            .iter()
            .map(|r| r.iter().map(|x| big(*x)).collect())
            .collect();

        let kernel = left_kernel(&rows, &n).unwrap();
        assert_eq!(kernel.len(), 2);
        for v in kernel.iter() {
            assert!(v.iter().any(|x| !x.is_zero()));
            assert!(vector_matrix_product(v, &rows, &n).iter().all(|x| x.is_zero()));
        }
    }

    #[test]
    fn test_random_sampling() {
        let mut rng = DRNG::from_seed("arithmetic_random_sampling".as_bytes());
        let bound = big(1_000_003);
        for _ in 0..200 {
            let x = random_below(&mut rng, &bound);
            assert!(x >= BigInt::zero() && x < bound);
            let y = random_in_range(&mut rng, &big(-5), &big(5));
            assert!(y >= big(-5) && y <= big(5));
        }

        let mut a = DRNG::from_seed("same_seed".as_bytes());
        let mut b = DRNG::from_seed("same_seed".as_bytes());
        assert_eq!(random_below(&mut a, &bound), random_below(&mut b, &bound));
    }
}
