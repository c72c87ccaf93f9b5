//! Criterion micro-benchmarks for message acquire, append, promotion, and split.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use slabwire_bench::{reference_arena, request_chunks};
use slabwire_core::SizeClass;
use slabwire_service::{dispatch, MimeService};

/// Benchmark: acquire a small block and release it.
fn bench_acquire_release(c: &mut Criterion) {
    let arena = reference_arena().unwrap();
    c.bench_function("acquire_release", |b| {
        b.iter(|| {
            let message = arena.acquire().unwrap();
            black_box(message.offset());
            black_box(message.class() == SizeClass::Small);
            message.release();
        });
    });
}

/// Benchmark: a 512-byte request that stays in its small block.
fn bench_append_small(c: &mut Criterion) {
    let arena = reference_arena().unwrap();
    let chunks = request_chunks(512, 128);
    c.bench_function("append_small_512", |b| {
        b.iter(|| {
            let mut message = arena.acquire().unwrap();
            for chunk in &chunks {
                message.append_all(chunk).unwrap();
            }
            black_box(message.len());
        });
    });
}

/// Benchmark: a 200K request delivered in 4K reads, promoted small → medium → large.
fn bench_append_promote_to_large(c: &mut Criterion) {
    let arena = reference_arena().unwrap();
    let chunks = request_chunks(200_000, 4096);
    c.bench_function("append_promote_to_large_200k", |b| {
        b.iter(|| {
            let mut message = arena.acquire().unwrap();
            for chunk in &chunks {
                message.append_all(chunk).unwrap();
            }
            assert_eq!(message.class(), SizeClass::Large);
            black_box(message.len());
        });
    });
}

/// Benchmark: split the tail of a pipelined read into a fresh message.
fn bench_split_tail(c: &mut Criterion) {
    let arena = reference_arena().unwrap();
    let chunks = request_chunks(3000, 3000);
    c.bench_function("split_tail_1k", |b| {
        b.iter(|| {
            let mut first = arena.acquire().unwrap();
            first.append_all(&chunks[0]).unwrap();
            let mut next = arena.acquire().unwrap();
            let tail = next.split_tail(&first, 2000).unwrap();
            first.truncate(2000);
            black_box(tail);
        });
    });
}

/// Benchmark: read a request into the arena and dispatch it to a service.
fn bench_dispatch(c: &mut Criterion) {
    let arena = reference_arena().unwrap();
    c.bench_function("dispatch_mime", |b| {
        b.iter(|| {
            let mut message = arena.acquire().unwrap();
            message.append_all(b"/image/logo.png").unwrap();
            let response = dispatch(message, &MimeService);
            black_box(response.status());
        });
    });
}

criterion_group!(
    benches,
    bench_acquire_release,
    bench_append_small,
    bench_append_promote_to_large,
    bench_split_tail,
    bench_dispatch
);
criterion_main!(benches);
