#![allow(non_snake_case)]

#[cfg(test)]
mod test_cornacchia {
    use klpt::error::KlptError;
    use klpt::utilities::arithmetic::{is_prime, legendre_symbol};
    use klpt::utilities::cornacchia::{cornacchia, sum_of_two_squares};
    use klpt::utilities::random::random_in_range;
    use klpt::utilities::test_utils::drng::DRNG;
    use num_bigint::BigInt;
    use num_integer::Integer;
    use num_traits::One;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    fn check_solution(d: &BigInt, m: &BigInt, (x, y): &(BigInt, BigInt)) {
        assert_eq!(x * x + d * y * y, *m, "x^2 + {d} y^2 = {m}");
        assert!(x.gcd(y).is_one(), "({x}, {y}) is primitive");
    }

    #[test]
    fn test_small_cases() {
        assert_eq!(cornacchia(&big(2), &big(22)).unwrap(), Some((big(2), big(3))));
        assert_eq!(cornacchia(&big(3), &big(7)).unwrap(), Some((big(2), big(1))));
        assert_eq!(cornacchia(&big(5), &big(5)).unwrap(), Some((big(0), big(1))));
        // -2 is not a square modulo 5
        assert_eq!(cornacchia(&big(2), &big(5)).unwrap(), None);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            cornacchia(&big(2), &big(0)),
            Err(KlptError::InvalidInput { .. })
        ));
        assert!(matches!(
            cornacchia(&big(2), &big(-22)),
            Err(KlptError::InvalidInput { .. })
        ));
        assert!(matches!(
            cornacchia(&big(0), &big(22)),
            Err(KlptError::InvalidInput { .. })
        ));
        assert!(matches!(
            cornacchia(&big(-3), &big(7)),
            Err(KlptError::InvalidInput { .. })
        ));
        assert!(matches!(
            sum_of_two_squares(&big(0)),
            Err(KlptError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_sum_of_two_squares() {
        assert_eq!(sum_of_two_squares(&big(1)).unwrap(), Some((big(1), big(0))));
        assert_eq!(sum_of_two_squares(&big(2)).unwrap(), Some((big(1), big(1))));

        for p in [5, 13, 17, 29, 101, 1009, 1_000_000_009] {
            let p = big(p);
            let solution = sum_of_two_squares(&p).unwrap().unwrap();
            check_solution(&BigInt::one(), &p, &solution);
        }
        for p in [3, 7, 59, 1019] {
            assert_eq!(sum_of_two_squares(&big(p)).unwrap(), None);
        }

        // Every square root of -1 modulo 65 gives one of 1 + 64 or 49 + 16.
        let solution = sum_of_two_squares(&big(65)).unwrap().unwrap();
        check_solution(&BigInt::one(), &big(65), &solution);
        // 21 = 3 * 7 has no representation at all.
        assert_eq!(sum_of_two_squares(&big(21)).unwrap(), None);
    }

    #[test]
    fn test_class_number_one_forms() {
        // x^2 + d y^2 represents an odd prime m exactly when -d is a square
        // modulo m, for these d.
        let mut rng = DRNG::from_seed("cornacchia_class_number_one".as_bytes());
        let mut tested = 0;
        while tested < 40 {
            let m = random_in_range(&mut rng, &big(1_000), &big(1_000_000));
            if !is_prime(&m) {
                continue;
            }
            tested += 1;
            for d in [1, 2, 3, 7] {
                let d = big(d);
                let solution = cornacchia(&d, &m).unwrap();
                if legendre_symbol(&-&d, &m) == 1 {
                    check_solution(&d, &m, &solution.unwrap());
                } else {
                    assert_eq!(solution, None);
                }
            }
        }
    }
}
