//! Benchmarks for Hamming distance and brute-force matching.
//!
//! Distance evaluation dominates both tree descent and the matcher's inner
//! loop, so these set the baseline every indexed variant is compared to.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use freakmatch::{BinaryFeatureMatcher, Descriptor768, FeaturePoint, FeatureStore};
use rand::prelude::*;

// === Generators ===

fn random_descriptors(n: usize, seed: u64) -> Vec<Descriptor768> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| Descriptor768::from_words(rng.gen())).collect()
}

fn random_store(n: usize, seed: u64) -> FeatureStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = FeatureStore::with_capacity(n);
    for d in random_descriptors(n, seed) {
        let point = FeaturePoint::new(
            rng.gen::<f32>() * 640.0,
            rng.gen::<f32>() * 480.0,
            rng.gen(),
        );
        store.push(d, point);
    }
    store
}

// === Benchmarks ===

fn bench_hamming(c: &mut Criterion) {
    let vectors = random_descriptors(2, 42);
    let (a, b) = (&vectors[0], &vectors[1]);

    c.bench_function("hamming_768", |bench| {
        bench.iter(|| black_box(a).hamming_distance(black_box(b)));
    });
}

fn bench_batch_hamming(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_hamming");

    for n in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*n as u64));

        let vectors = random_descriptors(*n + 1, 42);
        let query = &vectors[0];
        let candidates = &vectors[1..];

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |bench, _| {
            bench.iter(|| {
                candidates
                    .iter()
                    .map(|c| black_box(query).hamming_distance(black_box(c)))
                    .min()
            });
        });
    }

    group.finish();
}

fn bench_brute_force_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_brute_force");
    group.sample_size(20);

    for n in [100, 500, 1000].iter() {
        group.throughput(Throughput::Elements((*n * *n) as u64));

        let query = random_store(*n, 1);
        let reference = random_store(*n, 2);
        let mut matcher = BinaryFeatureMatcher::new();

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |bench, _| {
            bench.iter(|| matcher.match_brute_force(black_box(&query), black_box(&reference)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hamming,
    bench_batch_hamming,
    bench_brute_force_matching,
);
criterion_main!(benches);
