use rand_core::{CryptoRng, RngCore};
use sha3::{
    Shake256, Shake256Reader,
    digest::{ExtendableOutput, Update, XofReader},
};

/// Deterministic random generator for tests and benchmarks: the seed is
/// absorbed into SHAKE256 and randomness is squeezed from the XOF.
///
/// This is NOT a secure source of randomness for anything but reproducible
/// test runs, the full stream is a function of the seed alone.
pub struct DRNG {
    reader: Shake256Reader,
}

impl DRNG {
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut shake = Shake256::default();
        shake.update(b"klpt-drng");
        shake.update(seed);
        Self {
            reader: shake.finalize_xof(),
        }
    }
}

impl RngCore for DRNG {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.reader.read(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.reader.read(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.reader.read(dest);
    }
}

impl CryptoRng for DRNG {}
