use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use decimal_algebra::{range, BigDecimal, MathContext};
use rayon::prelude::*;
use std::time::Duration;

fn sizes() -> Vec<u64> {
    vec![1_000, 10_000, 100_000]
}

pub fn bench_range_sum(c: &mut Criterion) {
    let mc = MathContext::decimal128();
    let step: BigDecimal = "0.001".parse().unwrap();

    let mut group = c.benchmark_group("Decimal_Range_Sum");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for count in sizes() {
        let end = &step * BigDecimal::from(count);

        group.bench_with_input(BenchmarkId::new("sequential", count), &count, |b, _| {
            b.iter(|| {
                range(BigDecimal::from(0), &end, step.clone(), &mc)
                    .unwrap()
                    .fold(BigDecimal::from(0), |acc, value| acc + value)
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", count), &count, |b, _| {
            b.iter(|| {
                range(BigDecimal::from(0), &end, step.clone(), &mc)
                    .unwrap()
                    .into_par_iter()
                    .reduce(|| BigDecimal::from(0), |a, b| a + b)
            });
        });
    }
    group.finish();
}

criterion_group!(range_benches, bench_range_sum);
criterion_main!(range_benches);
