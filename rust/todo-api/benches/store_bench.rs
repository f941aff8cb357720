//! Store operation benchmarks.
//!
//! Lookups are a linear scan, so `get` and `toggle` are measured against
//! growing collection sizes.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use todo_api::domain::{NewTodo, TodoId};
use todo_api::store::TodoStore;

fn filled_store(count: u64) -> TodoStore {
    let store = TodoStore::default();
    for i in 0..count {
        let _ = store.create(NewTodo::text(format!("todo {i}")));
    }
    store
}

fn benchmark_create(c: &mut Criterion) {
    c.bench_function("create", |b| {
        let store = TodoStore::default();
        b.iter(|| black_box(store.create(NewTodo::text("bench"))));
    });
}

fn benchmark_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_last");

    for count in [100_u64, 1_000, 10_000] {
        let store = filled_store(count);
        let last = TodoId(count);

        group.bench_with_input(BenchmarkId::new("get", count), &last, |b, &id| {
            b.iter(|| black_box(store.get(id)));
        });
        group.bench_with_input(BenchmarkId::new("toggle", count), &last, |b, &id| {
            b.iter(|| black_box(store.toggle(id)));
        });
    }

    group.finish();
}

fn benchmark_list(c: &mut Criterion) {
    let store = filled_store(1_000);
    c.bench_function("list_1000", |b| b.iter(|| black_box(store.list())));
}

criterion_group!(benches, benchmark_create, benchmark_lookup, benchmark_list);
criterion_main!(benches);
