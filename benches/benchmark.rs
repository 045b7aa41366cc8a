// Benchmarks for the permutation-heavy measures
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand::rngs::StdRng;
use simx::{MeasureInput, MeasureRegistry, PermutationConfig, Value};

fn random_labels(rng: &mut StdRng, n: usize, categories: usize) -> Vec<Value> {
    (0..n)
        .map(|_| Value::from(format!("c{}", rng.random_range(0..categories))))
        .collect()
}

fn random_numbers(rng: &mut StdRng, n: usize) -> Vec<Value> {
    (0..n).map(|_| Value::from(rng.random_range(-10.0..10.0))).collect()
}

fn benchmark_measure(c: &mut Criterion, id: &str, input: impl Fn(&mut StdRng, usize) -> MeasureInput) {
    let measure = MeasureRegistry::global().by_id(id).unwrap();
    let config = PermutationConfig::seeded(42);
    let mut group = c.benchmark_group(id);
    group.sample_size(10);

    for size in [100, 1000, 5000].iter() {
        let mut rng = StdRng::seed_from_u64(*size as u64);
        let input = input(&mut rng, *size);
        group.bench_with_input(BenchmarkId::new("simx", size), size, |b, _| {
            b.iter(|| black_box(measure.compute_detached(&input, &config).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_adjusted_rand(c: &mut Criterion) {
    benchmark_measure(c, "adjusted_rand", |rng, n| {
        MeasureInput::new(random_labels(rng, n, 5), random_labels(rng, n, 4))
    });
}

fn benchmark_enrichment(c: &mut Criterion) {
    benchmark_measure(c, "enrichment_score", |rng, n| {
        MeasureInput::new(random_numbers(rng, n), random_labels(rng, n, 3))
    });
}

fn benchmark_jaccard(c: &mut Criterion) {
    benchmark_measure(c, "jaccard", |rng, n| {
        let reference = random_labels(rng, n, 20);
        let a = reference[..n / 4].to_vec();
        let b = reference[n / 2..n / 2 + n / 4].to_vec();
        MeasureInput::new(a, b).with_reference(reference)
    });
}

fn benchmark_rank_tests(c: &mut Criterion) {
    benchmark_measure(c, "wilcoxon_rank_sum", |rng, n| {
        MeasureInput::new(random_numbers(rng, n), random_numbers(rng, n))
    });
}

criterion_group!(
    benches,
    benchmark_adjusted_rand,
    benchmark_enrichment,
    benchmark_jaccard,
    benchmark_rank_tests
);
criterion_main!(benches);
