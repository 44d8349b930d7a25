//! # SHA-Infinity Benchmarks
//!
//! | Operation | Cost |
//! |-----------|------|
//! | Chained hash | O(depth) digest applications |
//! | Record creation | canonicalize + 1 + chain |
//! | Merkle root | O(n) chained hashes |
//! | Cached chain hit | one LRU lookup |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use std::time::Duration;

use sha_infinity::{to_canonical_bytes, ChainConfig, Digest, EngineConfig, IntegrityApi, IntegrityService};
use shared_crypto::sha256;

fn board(cards: usize) -> Value {
    let cards: Vec<Value> = (0..cards)
        .map(|i| json!({"id": i, "title": format!("card {}", i), "column": "todo", "tags": ["a", "b"]}))
        .collect();
    json!({"columns": ["todo", "doing", "done"], "cards": cards})
}

fn uncached() -> IntegrityService<sha_infinity::Sha256Backend> {
    IntegrityService::sha256(EngineConfig::default().with_cache_capacity(0)).unwrap()
}

fn bench_chain_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain-hash");
    group.measurement_time(Duration::from_secs(5));
    let service = uncached();

    for depth in [1u32, 7, 64, 256] {
        let config = ChainConfig::default().with_depth(depth);
        group.throughput(Throughput::Elements(u64::from(depth)));
        group.bench_with_input(BenchmarkId::new("depth", depth), &config, |b, config| {
            b.iter(|| black_box(service.chain_hash(black_box(b"payload"), config).unwrap()))
        });
    }

    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let service = IntegrityService::sha256(EngineConfig::default()).unwrap();
    let config = ChainConfig::default().with_depth(256);
    service.chain_hash(b"payload", &config).unwrap();

    c.bench_function("chain-hash/cached-depth-256", |b| {
        b.iter(|| black_box(service.chain_hash(black_box(b"payload"), &config).unwrap()))
    });
}

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");
    let service = uncached();

    for cards in [10usize, 100, 1_000] {
        let state = board(cards);
        group.bench_with_input(BenchmarkId::new("canonicalize", cards), &state, |b, state| {
            b.iter(|| black_box(to_canonical_bytes(state).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("create", cards), &state, |b, state| {
            b.iter(|| black_box(service.create_integrity(state, None).unwrap()))
        });

        let record = service.create_integrity(&state, None).unwrap();
        group.bench_with_input(BenchmarkId::new("verify", cards), &state, |b, state| {
            b.iter(|| black_box(service.verify_integrity(state, &record).unwrap()))
        });
    }

    group.finish();
}

fn bench_merkle(c: &mut Criterion) {
    let mut group = c.benchmark_group("merkle-root");
    let service = uncached();

    for n in [2usize, 16, 128] {
        let leaves: Vec<Digest> = (0..n as u64).map(|i| sha256(&i.to_le_bytes())).collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("leaves", n), &leaves, |b, leaves| {
            b.iter(|| black_box(service.merkle_root(leaves, None).unwrap()))
        });
    }

    group.finish();
}

fn bench_pow(c: &mut Criterion) {
    let service = uncached();
    c.bench_function("proof-of-work/difficulty-2-depth-1", |b| {
        b.iter(|| black_box(service.proof_of_work(b"block", Some(2), Some(1)).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_chain_depth,
    bench_cache_hit,
    bench_records,
    bench_merkle,
    bench_pow
);
criterion_main!(benches);
