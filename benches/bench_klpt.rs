mod benchmark_klpt {
    use klpt::klpt::{ell_power_equiv, element_of_norm};
    use klpt::quaternion::{Order, Quaternion, QuaternionAlgebra, left_ideal};
    use klpt::utilities::test_utils::drng::DRNG;
    use num_bigint::BigInt;

    use criterion::{Criterion, criterion_group};
    use std::time::Duration;

    fn benchmark_ell_power_equiv(c: &mut Criterion) {
        let mut rng = DRNG::from_seed("bench_ell_power_equiv".as_bytes());
        let p = BigInt::from(1_000_000_007);
        let algebra = QuaternionAlgebra::from_prime(&p);
        let O = Order::standard_maximal(&algebra).unwrap();

        // 3 divides N(1 + j) = p + 1
        let gens = [
            Quaternion::from_i64(&algebra, [1, 0, 1, 0]),
            Quaternion::from_i64(&algebra, [3, 0, 0, 0]),
        ];
        let I = left_ideal(&gens, &O).unwrap();
        let ell = BigInt::from(2);

        let bench_id = format!("Benchmarking ell_power_equiv for p = {p}, ell = {ell}");
        c.bench_function(&bench_id, |b| b.iter(|| ell_power_equiv(&I, &O, &ell, &mut rng)));
    }

    fn benchmark_element_of_norm(c: &mut Criterion) {
        let p = BigInt::from(1_000_000_007);
        let algebra = QuaternionAlgebra::from_prime(&p);
        let O_0 = Order::special(&algebra).unwrap();
        let M: BigInt = &p << 16u32;

        let bench_id = format!("Benchmarking element_of_norm for M = {M}");
        c.bench_function(&bench_id, |b| b.iter(|| element_of_norm(&M, &O_0)));
    }

    criterion_group! {
        name = klpt_benchmarks;
        config = Criterion::default().measurement_time(Duration::from_secs(15));
        targets = benchmark_ell_power_equiv, benchmark_element_of_norm,
    }
}

fn main() {
    benchmark_klpt::klpt_benchmarks();
}
