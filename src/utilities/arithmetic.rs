//! Integer number theory used throughout the KLPT steps: primality,
//! quadratic residuosity, modular square roots and factorisation.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

static SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

// Deterministic for n < 3.3 * 10^24, negligible error above.
static MILLER_RABIN_BASES: [u32; 16] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Return `n mod m` as a machine word for a small modulus `m`.
fn small_residue(n: &BigInt, m: u32) -> u32 {
    n.mod_floor(&BigInt::from(m)).to_u32().unwrap_or(0)
}

/// Primality test: trial division by small primes followed by Miller-Rabin.
pub fn is_prime(n: &BigInt) -> bool {
    if n < &BigInt::from(2) {
        return false;
    }
    for p in SMALL_PRIMES.iter() {
        let p = BigInt::from(*p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // Write n - 1 = d * 2^s with d odd.
    let n_minus_one: BigInt = n - 1;
    let mut d = n_minus_one.clone();
    let mut s = 0usize;
    while d.is_even() {
        d >>= 1usize;
        s += 1;
    }

    'witness: for a in MILLER_RABIN_BASES.iter() {
        let mut x = BigInt::from(*a).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// The Jacobi symbol (a / n) for odd positive n.
pub fn jacobi_symbol(a: &BigInt, n: &BigInt) -> i8 {
    assert!(
        n.is_positive() && n.is_odd(),
        "Jacobi symbol needs an odd positive modulus, got {n}"
    );

    let mut a = a.mod_floor(n);
    let mut n = n.clone();
    let mut result = 1i8;
    while !a.is_zero() {
        while a.is_even() {
            a >>= 1usize;
            let r = small_residue(&n, 8);
            if r == 3 || r == 5 {
                result = -result;
            }
        }
        std::mem::swap(&mut a, &mut n);
        if small_residue(&a, 4) == 3 && small_residue(&n, 4) == 3 {
            result = -result;
        }
        a = a.mod_floor(&n);
    }

    if n.is_one() { result } else { 0 }
}

/// The Legendre symbol (a / p) for an odd prime p.
pub fn legendre_symbol(a: &BigInt, p: &BigInt) -> i8 {
    jacobi_symbol(a, p)
}

/// Return a^-1 mod m, or `None` when gcd(a, m) != 1.
pub fn inverse_mod(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    let egcd = a.mod_floor(m).extended_gcd(m);
    if !egcd.gcd.is_one() {
        return None;
    }
    Some(egcd.x.mod_floor(m))
}

/// Representative of `a mod m` in the balanced interval (-m/2, m/2].
pub fn balanced_mod(a: &BigInt, m: &BigInt) -> BigInt {
    let r = a.mod_floor(m);
    if &r * 2 > *m { r - m } else { r }
}

/// Return sqrt(n) when n is a perfect square.
pub fn integer_sqrt_exact(n: &BigInt) -> Option<BigInt> {
    if n.is_negative() {
        return None;
    }
    let r = n.sqrt();
    if &r * &r == *n { Some(r) } else { None }
}

/// The largest v such that p^v divides n (n nonzero, p > 1).
pub fn valuation(n: &BigInt, p: &BigInt) -> u32 {
    debug_assert!(!n.is_zero());
    let mut n = n.abs();
    let mut v = 0;
    while (&n % p).is_zero() {
        n /= p;
        v += 1;
    }
    v
}

/// Return k when n = ell^k for some k >= 0.
pub fn power_of(n: &BigInt, ell: &BigInt) -> Option<u32> {
    if !n.is_positive() {
        return None;
    }
    let k = valuation(n, ell);
    if ell.pow(k) == *n { Some(k) } else { None }
}

/// Chinese remainder: x = r1 mod m1, x = r2 mod m2 for coprime m1, m2.
pub fn crt(r1: &BigInt, m1: &BigInt, r2: &BigInt, m2: &BigInt) -> Option<BigInt> {
    let m1_inv = inverse_mod(m1, m2)?;
    let t = ((r2 - r1) * m1_inv).mod_floor(m2);
    Some((r1 + m1 * t).mod_floor(&(m1 * m2)))
}

/// Tonelli-Shanks: a square root of a modulo the prime p.
pub fn sqrt_mod_prime(a: &BigInt, p: &BigInt) -> Option<BigInt> {
    let a = a.mod_floor(p);
    if a.is_zero() {
        return Some(a);
    }
    if *p == BigInt::from(2) {
        return Some(a);
    }
    if legendre_symbol(&a, p) != 1 {
        return None;
    }

    // p = 3 mod 4 has the closed form a^((p + 1) / 4).
    if small_residue(p, 4) == 3 {
        let e: BigInt = (p + 1) >> 2usize;
        return Some(a.modpow(&e, p));
    }

    // p - 1 = q * 2^s with q odd
    let mut q: BigInt = p - 1;
    let mut s = 0usize;
    while q.is_even() {
        q >>= 1usize;
        s += 1;
    }

    let mut z = BigInt::from(2);
    while legendre_symbol(&z, p) != -1 {
        z += 1;
    }

    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = a.modpow(&q, p);
    let mut r = a.modpow(&((&q + 1) >> 1usize), p);

    while !t.is_one() {
        // Find the least i with t^(2^i) = 1.
        let mut i = 0usize;
        let mut t2 = t.clone();
        while !t2.is_one() {
            t2 = (&t2 * &t2) % p;
            i += 1;
            if i == m {
                return None;
            }
        }

        let b = c.modpow(&(BigInt::one() << (m - i - 1)), p);
        m = i;
        c = (&b * &b) % p;
        t = (t * &c) % p;
        r = (r * &b) % p;
    }

    Some(r)
}

/// A square root of an odd `unit` modulo 2^k.
fn sqrt_mod_two_power(unit: &BigInt, k: u32) -> Option<BigInt> {
    match k {
        0 => Some(BigInt::zero()),
        1 => Some(BigInt::one()),
        2 => (small_residue(unit, 4) == 1).then(BigInt::one),
        _ => {
            if small_residue(unit, 8) != 1 {
                return None;
            }
            // Invariant: r^2 = unit mod 2^i.
            let mut r = BigInt::one();
            for i in 3..k {
                let next = BigInt::one() << (i + 1);
                if !(&r * &r - unit).mod_floor(&next).is_zero() {
                    r += BigInt::one() << (i - 1);
                }
            }
            Some(r.mod_floor(&(BigInt::one() << k)))
        }
    }
}

/// A square root of a modulo p^k.
fn sqrt_mod_prime_power(a: &BigInt, p: &BigInt, k: u32) -> Option<BigInt> {
    let pk = p.pow(k);
    let a = a.mod_floor(&pk);
    if a.is_zero() {
        return Some(a);
    }

    // Peel off an even power of p: a = p^(2s) * unit.
    let v = valuation(&a, p);
    if v % 2 == 1 {
        return None;
    }
    let unit = &a / p.pow(v);
    let reduced_k = k - v;

    let r = if *p == BigInt::from(2) {
        sqrt_mod_two_power(&unit, reduced_k)?
    } else {
        // Hensel lifting from p to p^reduced_k.
        let mut r = sqrt_mod_prime(&unit, p)?;
        let mut modulus = p.clone();
        for _ in 1..reduced_k {
            modulus *= p;
            let inv = inverse_mod(&(&r * 2), &modulus)?;
            r = (&r - (&r * &r - &unit) * inv).mod_floor(&modulus);
        }
        r
    };

    Some((r * p.pow(v / 2)).mod_floor(&pk))
}

/// A square root of a modulo an arbitrary positive m, found by factoring m,
/// lifting on each prime power and recombining.
pub fn sqrt_mod(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    assert!(m.is_positive(), "modulus must be positive, got {m}");
    if m.is_one() {
        return Some(BigInt::zero());
    }

    let mut root = BigInt::zero();
    let mut modulus = BigInt::one();
    for (p, k) in factor(m) {
        let pk = p.pow(k);
        let r = sqrt_mod_prime_power(a, &p, k)?;
        root = crt(&root, &modulus, &r, &pk)?;
        modulus *= pk;
    }
    Some(root)
}

/// Pollard rho with Floyd cycle detection, for composite n without small
/// factors.
fn pollard_rho(n: &BigInt) -> BigInt {
    if let Some(r) = integer_sqrt_exact(n) {
        return r;
    }

    let mut c = BigInt::one();
    loop {
        let f = |x: &BigInt| (x * x + &c) % n;
        let mut x = BigInt::from(2);
        let mut y = BigInt::from(2);
        let mut d = BigInt::one();
        while d.is_one() {
            x = f(&x);
            y = f(&f(&y));
            d = (&x - &y).abs().gcd(n);
        }
        if &d != n {
            return d;
        }
        c += 1;
    }
}

/// Factor |n| into (prime, exponent) pairs sorted by prime.
pub fn factor(n: &BigInt) -> Vec<(BigInt, u32)> {
    let mut n = n.abs();
    let mut primes: Vec<BigInt> = Vec::new();

    for p in SMALL_PRIMES.iter() {
        let p = BigInt::from(*p);
        while !n.is_zero() && (&n % &p).is_zero() {
            n /= &p;
            primes.push(p.clone());
        }
    }

    let mut stack = Vec::new();
    if n > BigInt::one() {
        stack.push(n);
    }
    while let Some(m) = stack.pop() {
        if is_prime(&m) {
            primes.push(m);
            continue;
        }
        let d = pollard_rho(&m);
        stack.push(&m / &d);
        stack.push(d);
    }

    primes.sort();
    let mut factors: Vec<(BigInt, u32)> = Vec::new();
    for p in primes {
        match factors.last_mut() {
            Some((q, k)) if *q == p => *k += 1,
            _ => factors.push((p, 1)),
        }
    }
    factors
}

/// All positive divisors of a nonzero n, in increasing order.
pub fn divisors(n: &BigInt) -> Vec<BigInt> {
    let mut divs = vec![BigInt::one()];
    for (p, k) in factor(n) {
        let mut next = Vec::with_capacity(divs.len() * (k as usize + 1));
        for d in divs.iter() {
            let mut pe = BigInt::one();
            for _ in 0..=k {
                next.push(d * &pe);
                pe *= &p;
            }
        }
        divs = next;
    }
    divs.sort();
    divs
}
