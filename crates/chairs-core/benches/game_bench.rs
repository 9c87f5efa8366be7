//! Benchmarks for the musical chairs core
//!
//! Measures:
//! - Uncontended and exhausted gate claims
//! - Full games with zero music time, at several player counts

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chairs_core::{ChairGate, Game, GameConfig};

/// Benchmark a single claim against a fresh gate
fn bench_gate_claim(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_claim");
    group.throughput(Throughput::Elements(1));

    group.bench_function("available", |b| {
        b.iter(|| {
            let gate = ChairGate::new(1, 1);
            black_box(gate.try_claim())
        })
    });

    let exhausted = ChairGate::new(1, 0);
    group.bench_function("exhausted", |b| b.iter(|| black_box(exhausted.try_claim())));

    group.finish();
}

/// Benchmark complete games, back-to-back rounds
fn bench_instant_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("instant_game");
    group.sample_size(20);

    for &players in &[2usize, 4, 8, 16] {
        group.throughput(Throughput::Elements(players as u64 - 1));
        group.bench_with_input(BenchmarkId::from_parameter(players), &players, |b, &n| {
            b.iter(|| {
                let summary = Game::new(GameConfig::instant(n)).run().unwrap();
                black_box(summary.winner)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gate_claim, bench_instant_game);
criterion_main!(benches);
