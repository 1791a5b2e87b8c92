//! Benchmarks for skip list insert/search/delete.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use skipkv::{CoinFlip, SkipList};
use std::collections::BTreeMap;

const SIZES: [u64; 3] = [1_000, 10_000, 100_000];

fn filled(n: u64) -> SkipList<u64, u64, CoinFlip> {
    let sl = SkipList::with_generator(18, CoinFlip::seeded(n));
    // odd multiplier spreads keys without repeats
    for i in 0..n {
        sl.insert(i.wrapping_mul(0x9E37_79B9_7F4A_7C15), i).unwrap();
    }
    sl
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for &n in SIZES.iter() {
        group.throughput(Throughput::Elements(n));

        group.bench_with_input(BenchmarkId::new("skiplist", n), &n, |b, &n| {
            b.iter(|| black_box(filled(n)));
        });

        group.bench_with_input(BenchmarkId::new("btreemap", n), &n, |b, &n| {
            b.iter(|| {
                let mut m = BTreeMap::new();
                for i in 0..n {
                    m.insert(i.wrapping_mul(0x9E37_79B9_7F4A_7C15), i);
                }
                black_box(m)
            });
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for &n in SIZES.iter() {
        let sl = filled(n);
        let mut i = 0u64;
        group.bench_function(BenchmarkId::new("hit", n), |b| {
            b.iter(|| {
                i = (i + 1) % n;
                black_box(sl.search(&i.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
            });
        });
        group.bench_function(BenchmarkId::new("miss", n), |b| {
            b.iter(|| black_box(sl.search(&black_box(1))))
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let sl = filled(10_000);
    let mut k = 0u64;

    c.bench_function("churn/insert_delete", |b| {
        b.iter(|| {
            k = k.wrapping_add(1) | 1 << 63;
            sl.insert(k, k).unwrap();
            black_box(sl.delete(&k))
        });
    });
}

criterion_group!(benches, bench_insert, bench_search, bench_churn);
criterion_main!(benches);
