use super::{Klpt, KlptParameters};

const PRIME_NORM_INITIAL_BOUND: i64 = 10;
const PRIME_NORM_WIDEN_EVERY: usize = 128;
const PRIME_NORM_MAX_ATTEMPTS: usize = 8192;
const GENERATOR_SEARCH_BOUND: i64 = 4;
const NORM_MARGIN_BITS: u32 = 12;
const ELEMENT_OF_NORM_RETRIES: usize = 16;
const REPRESENTATIVE_RETRIES: usize = 8;
const STRONG_APPROXIMATION_ATTEMPTS: usize = 128;
const STRONG_APPROXIMATION_HEADROOM: u32 = 48;

pub const KLPT_DEFAULT_PARAMETERS: KlptParameters = KlptParameters {
    prime_norm_initial_bound: PRIME_NORM_INITIAL_BOUND,
    prime_norm_widen_every: PRIME_NORM_WIDEN_EVERY,
    prime_norm_max_attempts: PRIME_NORM_MAX_ATTEMPTS,
    generator_search_bound: GENERATOR_SEARCH_BOUND,
    norm_margin_bits: NORM_MARGIN_BITS,
    element_of_norm_retries: ELEMENT_OF_NORM_RETRIES,
    representative_retries: REPRESENTATIVE_RETRIES,
    strong_approximation_attempts: STRONG_APPROXIMATION_ATTEMPTS,
    strong_approximation_headroom: STRONG_APPROXIMATION_HEADROOM,
};

pub const KLPT_DEFAULT: Klpt = Klpt::new(&KLPT_DEFAULT_PARAMETERS);
