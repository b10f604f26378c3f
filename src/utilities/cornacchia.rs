use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::{KlptError, Result};
use crate::utilities::arithmetic::{integer_sqrt_exact, is_prime, legendre_symbol, sqrt_mod};

/// Run the Euclidean descent of Cornacchia on (m, r0), where r0^2 = -d mod m,
/// and recover (x, y) from the first remainder below sqrt(m).
fn cornacchia_descent(d: &BigInt, m: &BigInt, r0: BigInt) -> Result<Option<(BigInt, BigInt)>> {
    let mut prev = m.clone();
    let mut curr = r0;
    while &curr * &curr >= *m {
        let next = prev.mod_floor(&curr);
        prev = curr;
        curr = next;
    }

    let x = curr;
    let (y_squared, remainder) = (m - &x * &x).div_rem(d);
    if !remainder.is_zero() {
        return Ok(None);
    }
    let Some(y) = integer_sqrt_exact(&y_squared) else {
        return Ok(None);
    };

    // Only primitive solutions are reported.
    if !x.gcd(&y).is_one() {
        return Ok(None);
    }
    if &x * &x + d * &y * &y != *m {
        return Err(KlptError::internal(format!(
            "({x}, {y}) does not solve x^2 + {d}*y^2 = {m}"
        )));
    }
    Ok(Some((x, y)))
}

/// Find a primitive solution of x^2 + y^2 = m.
///
/// Prime m = 1 mod 4 takes a square root of -1 from a quadratic non-residue,
/// other m go through the general modular square root.
pub fn sum_of_two_squares(m: &BigInt) -> Result<Option<(BigInt, BigInt)>> {
    if !m.is_positive() {
        return Err(KlptError::InvalidInput {
            reason: format!("m must be positive, got {m}"),
        });
    }

    let one = BigInt::one();
    let two = BigInt::from(2);
    if m.is_one() {
        return Ok(Some((one, BigInt::zero())));
    }
    if *m == two {
        return Ok(Some((one.clone(), one)));
    }

    let r0 = if is_prime(m) {
        if (m % 4u32) != one {
            return Ok(None);
        }
        let mut c = two;
        while legendre_symbol(&c, m) != -1 {
            c += 1;
        }
        let e: BigInt = (m - 1u32) >> 2usize;
        c.modpow(&e, m)
    } else {
        match sqrt_mod(&(m - 1u32), m) {
            Some(r) => r,
            None => return Ok(None),
        }
    };

    cornacchia_descent(&one, m, r0)
}

/// Find a primitive solution (x, y) of x^2 + d*y^2 = m with x, y >= 0.
///
/// Returns `Ok(None)` when -d is not a square modulo m, or when the root found
/// does not lead to a primitive solution. Non-positive m or d is an input
/// error.
pub fn cornacchia(d: &BigInt, m: &BigInt) -> Result<Option<(BigInt, BigInt)>> {
    if !m.is_positive() {
        return Err(KlptError::InvalidInput {
            reason: format!("m must be positive, got {m}"),
        });
    }
    if d.is_zero() {
        return Err(KlptError::InvalidInput {
            reason: "d must be nonzero".to_string(),
        });
    }
    if d.is_negative() {
        return Err(KlptError::InvalidInput {
            reason: format!("d must be positive, got {d}"),
        });
    }

    if d.is_one() {
        return sum_of_two_squares(m);
    }

    let minus_d = (-d).mod_floor(m);
    let Some(r0) = sqrt_mod(&minus_d, m) else {
        return Ok(None);
    };

    cornacchia_descent(d, m, r0)
}
