use apex_core::engine::pool::OrderPool;
use apex_core::prelude::*;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::thread;

fn order(id: u64) -> Order {
    Order::new(OrderType::GoodTillCancel, id, Side::Buy, 100, 10, 0)
}

fn bench_single_alloc(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool alloc");
    group.throughput(Throughput::Elements(1));
    group.bench_function("alloc one order", |b| {
        let pool = OrderPool::new();
        let mut id = 0u64;
        b.iter(|| {
            id += 1;
            black_box(pool.alloc(order(id)));
        });
    });
    group.finish();
}

fn bench_concurrent_alloc(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent alloc");
    group.throughput(Throughput::Elements(8_000));
    group.bench_function("8 threads x 1000 allocations", |b| {
        b.iter(|| {
            let pool = std::sync::Arc::new(OrderPool::new());
            let mut handles = vec![];
            for t in 0..8u64 {
                let pool = pool.clone();
                handles.push(thread::spawn(move || {
                    for i in 0..1000u64 {
                        black_box(pool.alloc(order(t * 1000 + i)));
                    }
                }));
            }
            for h in handles {
                h.join().unwrap();
            }
        });
    });
    group.finish();
}

fn bench_pool_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool expansion");
    group.throughput(Throughput::Elements(100_000));
    group.bench_function("100k allocations, multiple block installs", |b| {
        b.iter(|| {
            let pool = OrderPool::new();
            for i in 0..100_000u64 {
                black_box(pool.alloc(order(i)));
            }
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_single_alloc,
    bench_concurrent_alloc,
    bench_pool_expansion
);
criterion_main!(benches);
