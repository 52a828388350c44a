//! Rollout and search throughput.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mcts_engine::games::{Connect4, TicTacToe};
use mcts_engine::mcts::{parallel_rollouts, MCTSConfig, TreeSearch};
use mcts_engine::{GameRng, GameState};

// =============================================================================
// Playouts
// =============================================================================

fn bench_single_playout(c: &mut Criterion) {
    let mut group = c.benchmark_group("playout");
    let mut rng = GameRng::new(42);

    group.bench_function("tictactoe", |b| {
        let state = TicTacToe::new();
        b.iter(|| black_box(state.simulate_until_end(&mut rng).unwrap()))
    });
    group.bench_function("connect4", |b| {
        let state = Connect4::new();
        b.iter(|| black_box(state.simulate_until_end(&mut rng).unwrap()))
    });

    group.finish();
}

fn bench_parallel_rollouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_rollouts");
    let state = Connect4::new();

    for threads in [1, 2, 4, 8] {
        group.throughput(Throughput::Elements(256));
        group.bench_with_input(BenchmarkId::new("connect4", threads), &threads, |b, &threads| {
            b.iter(|| black_box(parallel_rollouts(&state, 256, threads).unwrap()))
        });
    }

    group.finish();
}

// =============================================================================
// Search
// =============================================================================

fn bench_search_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_steps");

    for steps in [100u64, 1000] {
        group.throughput(Throughput::Elements(steps));
        group.bench_with_input(BenchmarkId::new("connect4", steps), &steps, |b, &steps| {
            b.iter(|| {
                let search = TreeSearch::new(Connect4::new(), MCTSConfig::default()).unwrap();
                black_box(search.run_steps(steps).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_playout, bench_parallel_rollouts, bench_search_steps);
criterion_main!(benches);
