use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simvec::vector::core::distance::dot;
use simvec::vector::{SearchFilter, StoreConfig, VectorStore};

const DIMENSION: usize = 768;
const RECORDS: usize = 10_000;

fn random_vector(rng: &mut StdRng, dimension: usize) -> Vec<f32> {
    (0..dimension).map(|_| rng.random_range(-1.0..1.0)).collect()
}

fn build_store(workers: usize, rng: &mut StdRng) -> VectorStore {
    let store = VectorStore::with_config(StoreConfig::default().with_workers(workers)).unwrap();
    for i in 0..RECORDS {
        let vector = random_vector(rng, DIMENSION);
        store
            .upsert(format!("doc{i}"), &vector, HashMap::new(), "default")
            .unwrap();
    }
    store
}

fn bench_dot(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let a = random_vector(&mut rng, DIMENSION);
    let b = random_vector(&mut rng, DIMENSION);

    c.bench_function("dot_768", |bench| {
        bench.iter(|| black_box(dot(black_box(&a), black_box(&b))))
    });
}

fn bench_search(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let query = random_vector(&mut rng, DIMENSION);
    let filter = SearchFilter::new().namespace("default");

    let mut group = c.benchmark_group("search_10k_768");
    for workers in [1, 4, num_cpus::get()] {
        let store = build_store(workers, &mut rng);
        group.bench_with_input(BenchmarkId::new("workers", workers), &store, |b, store| {
            b.iter(|| black_box(store.search(black_box(&query), 5, &filter).unwrap()))
        });
    }
    group.finish();
}

fn bench_upsert(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let vectors: Vec<Vec<f32>> = (0..1_000).map(|_| random_vector(&mut rng, DIMENSION)).collect();

    c.bench_function("upsert_1k_768", |b| {
        b.iter(|| {
            let store = VectorStore::new().unwrap();
            for (i, vector) in vectors.iter().enumerate() {
                store
                    .upsert(format!("doc{i}"), vector, HashMap::new(), "default")
                    .unwrap();
            }
            black_box(store.len())
        })
    });
}

criterion_group!(benches, bench_dot, bench_search, bench_upsert);
criterion_main!(benches);
