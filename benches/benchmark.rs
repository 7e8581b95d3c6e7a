use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use avl_set::AvlTree;

const N: usize = 100_000;

pub fn benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (1..=N).map(|_| rng.gen()).collect();

    c.bench_function("tree_insert", |b| {
        let mut tree = AvlTree::new();
        b.iter(|| {
            for value in &values {
                tree.insert(*value);
            }
        })
    });

    let mut tree = AvlTree::new();
    for value in &values {
        tree.insert(*value);
    }

    c.bench_function("tree_contains", |b| {
        b.iter(|| {
            for value in &values {
                black_box(tree.contains(value));
            }
        })
    });

    c.bench_function("tree_traverse", |b| {
        b.iter(|| {
            tree.traverse_in_order(|value| {
                black_box(value);
            })
        })
    });

    c.bench_function("tree_clone", |b| b.iter(|| black_box(tree.clone())));

    c.bench_function("tree_remove", |b| {
        let mut tree = tree.clone();
        b.iter(|| {
            for value in &values {
                tree.remove(value);
            }
        })
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
