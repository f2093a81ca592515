use bplustree::{BPlusTree, TreeConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const ORDER: usize = 16;

// Deterministic pseudo-random permutation of 0..size
fn generate_keys(size: u64) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..size).collect();
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for i in (1..keys.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        keys.swap(i, (state % (i as u64 + 1)) as usize);
    }
    keys
}

fn configs() -> [(&'static str, TreeConfig); 2] {
    [
        ("dense", TreeConfig::dense(ORDER).unwrap()),
        ("sparse", TreeConfig::sparse(ORDER).unwrap()),
    ]
}

fn benchmark_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("bplustree_insert_random");

    for size in [1_000u64, 10_000, 100_000].iter() {
        let keys = generate_keys(*size);
        group.throughput(Throughput::Elements(*size));

        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, size), &keys, |b, keys| {
                b.iter(|| {
                    let mut tree = BPlusTree::new(config);
                    for &key in keys {
                        tree.insert(black_box(key));
                    }
                    tree
                });
            });
        }
    }

    group.finish();
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("bplustree_search");
    let size = 100_000u64;
    let keys = generate_keys(size);
    group.throughput(Throughput::Elements(size));

    for (name, config) in configs() {
        let tree = BPlusTree::from_keys(config, keys.iter().copied());
        group.bench_function(BenchmarkId::new(name, size), |b| {
            b.iter(|| {
                let mut found = 0usize;
                for key in &keys {
                    if tree.search(black_box(key)) {
                        found += 1;
                    }
                }
                found
            });
        });
    }

    group.finish();
}

fn benchmark_range_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("bplustree_range_search");
    let keys = generate_keys(100_000);

    for span in [10u64, 1_000, 10_000].iter() {
        for (name, config) in configs() {
            let tree = BPlusTree::from_keys(config, keys.iter().copied());
            group.bench_with_input(BenchmarkId::new(name, span), span, |b, &span| {
                b.iter(|| tree.range_search(black_box(&40_000), black_box(&(40_000 + span))));
            });
        }
    }

    group.finish();
}

fn benchmark_delete_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("bplustree_delete_random");
    let size = 10_000u64;
    let keys = generate_keys(size);
    group.throughput(Throughput::Elements(size));

    for (name, config) in configs() {
        group.bench_function(BenchmarkId::new(name, size), |b| {
            b.iter_batched(
                || BPlusTree::from_keys(config, keys.iter().copied()),
                |mut tree| {
                    for key in keys.iter().rev() {
                        tree.delete(black_box(key));
                    }
                    tree
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert_random,
    benchmark_search,
    benchmark_range_search,
    benchmark_delete_random
);
criterion_main!(benches);
