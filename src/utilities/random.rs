use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Signed;
use rand_core::{CryptoRng, RngCore};

/// Sample uniformly from [0, bound) by rejection on the bit length of bound.
pub fn random_below<R: CryptoRng + RngCore>(rng: &mut R, bound: &BigInt) -> BigInt {
    assert!(bound.is_positive(), "sampling bound must be positive, got {bound}");

    let bits = bound.bits() as usize;
    let n_bytes = bits.div_ceil(8);
    let excess = n_bytes * 8 - bits;
    let mut bytes = vec![0u8; n_bytes];
    loop {
        rng.fill_bytes(&mut bytes);
        if let Some(top) = bytes.last_mut() {
            *top &= 0xff >> excess;
        }
        let x = BigInt::from_biguint(Sign::Plus, BigUint::from_bytes_le(&bytes));
        if &x < bound {
            return x;
        }
    }
}

/// Sample uniformly from the inclusive range [lo, hi].
pub fn random_in_range<R: CryptoRng + RngCore>(rng: &mut R, lo: &BigInt, hi: &BigInt) -> BigInt {
    assert!(lo <= hi, "empty sampling range [{lo}, {hi}]");
    let width: BigInt = hi - lo + 1;
    lo + random_below(rng, &width)
}

