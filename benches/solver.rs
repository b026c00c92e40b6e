//! Benchmarks for the laser puzzle solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lazor::grid::Board;
use lazor::parser::parse_bff;
use lazor::{simulate, solve, Puzzle, SearchConfig, TraceLimits};

const DIAMOND: &str = include_str!("../puzzles/diamond.bff");
const SPLIT: &str = include_str!("../puzzles/split.bff");

fn puzzle(text: &str) -> Puzzle {
    parse_bff(text).expect("sample puzzle parses")
}

/// Benchmark the full parallel search on the diamond puzzle.
fn bench_solve(c: &mut Criterion) {
    let diamond = puzzle(DIAMOND);
    let config = SearchConfig::default();

    c.bench_function("solve_diamond", |b| {
        b.iter(|| solve(black_box(&diamond), &config))
    });
}

/// Benchmark the deterministic single-threaded search.
fn bench_solve_sequential(c: &mut Criterion) {
    let diamond = puzzle(DIAMOND);
    let config = SearchConfig {
        parallel: false,
        ..SearchConfig::default()
    };

    let mut group = c.benchmark_group("sequential");
    group.sample_size(20);
    group.bench_function("solve_diamond", |b| {
        b.iter(|| solve(black_box(&diamond), &config))
    });
    group.finish();
}

/// Benchmark tracing one board with a splitter.
fn bench_simulate(c: &mut Criterion) {
    let split = puzzle(SPLIT);
    let solution = solve(&split, &SearchConfig::default())
        .expect("split puzzle is well formed")
        .solution()
        .cloned()
        .expect("split puzzle has a solution");
    let board = Board::with_placement(&split, &solution.placement);
    let limits = TraceLimits::default();

    c.bench_function("simulate_split", |b| {
        b.iter(|| simulate(black_box(&board), &split.lasers, &split.targets, &limits))
    });
}

/// Benchmark reading a puzzle file.
fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_bff", |b| b.iter(|| parse_bff(black_box(DIAMOND))));
}

criterion_group!(
    benches,
    bench_solve,
    bench_solve_sequential,
    bench_simulate,
    bench_parse
);
criterion_main!(benches);
