mod benchmark_cornacchia {
    use klpt::utilities::arithmetic::is_prime;
    use klpt::utilities::cornacchia::{cornacchia, sum_of_two_squares};
    use klpt::utilities::random::random_in_range;
    use klpt::utilities::test_utils::drng::DRNG;
    use num_bigint::BigInt;
    use num_traits::One;

    use criterion::{Criterion, criterion_group};
    use std::time::Duration;

    /// A random prime m = 1 mod 4 of about `bits` bits.
    fn random_prime(bits: u32, rng: &mut DRNG) -> BigInt {
        let lo = BigInt::one() << (bits - 1);
        let hi = BigInt::one() << bits;
        loop {
            let m = random_in_range(rng, &lo, &hi);
            if (&m % 4u32).is_one() && is_prime(&m) {
                return m;
            }
        }
    }

    fn benchmark_sum_of_two_squares(c: &mut Criterion) {
        let mut rng = DRNG::from_seed("bench_sum_of_two_squares".as_bytes());
        let m = random_prime(256, &mut rng);

        let bench_id = "Benchmarking sum_of_two_squares for a 256-bit prime";
        c.bench_function(bench_id, |b| b.iter(|| sum_of_two_squares(&m)));
    }

    fn benchmark_cornacchia(c: &mut Criterion) {
        let mut rng = DRNG::from_seed("bench_cornacchia".as_bytes());
        let d = BigInt::from(7);
        let m = random_prime(256, &mut rng);

        let bench_id = format!("Benchmarking cornacchia for d = {d} and a 256-bit prime");
        c.bench_function(&bench_id, |b| b.iter(|| cornacchia(&d, &m)));
    }

    criterion_group! {
        name = cornacchia_benchmarks;
        config = Criterion::default().measurement_time(Duration::from_secs(15));
        targets = benchmark_sum_of_two_squares, benchmark_cornacchia,
    }
}

fn main() {
    benchmark_cornacchia::cornacchia_benchmarks();
}
