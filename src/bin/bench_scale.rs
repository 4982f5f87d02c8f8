use std::time::Instant;

use aether_automata::{Automaton, Boundary, Seed, SimpleAether, SymmetricAether};

const SEED_VALUE: i64 = 10_000_000;

fn bench_simple(dimension: usize, steps: u64) -> (f64, usize) {
    let mut engine =
        SimpleAether::new(dimension, Boundary::Unbounded, Seed::single(SEED_VALUE)).unwrap();
    let start = Instant::now();
    engine.step_n(steps);
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    (total_ms, engine.storage_len())
}

fn bench_symmetric(dimension: usize, steps: u64) -> (f64, usize) {
    let mut engine =
        SymmetricAether::new(dimension, Boundary::Unbounded, Seed::single(SEED_VALUE)).unwrap();
    let start = Instant::now();
    engine.step_n(steps);
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    (total_ms, engine.storage_len())
}

fn main() {
    let scales: &[(usize, u64)] = &[
        (1, 2_000),
        (2, 400),
        (3, 120),
        (4, 40), // dense storage gets large here
        (5, 16),
    ];

    println!(
        "{:<6} {:>8} {:>12} {:>12} {:>12} {:>12} {:>9}",
        "Dim", "Steps", "Cells", "Simple(ms)", "Canonical", "Sym(ms)", "Speedup"
    );
    println!("{}", "-".repeat(77));

    for &(dimension, steps) in scales {
        let (simple_ms, cells) = bench_simple(dimension, steps);
        let (symmetric_ms, canonical) = bench_symmetric(dimension, steps);
        println!(
            "{:<6} {:>8} {:>12} {:>12.1} {:>12} {:>12.1} {:>8.2}x",
            format!("{dimension}D"),
            steps,
            cells,
            simple_ms,
            canonical,
            symmetric_ms,
            simple_ms / symmetric_ms.max(f64::EPSILON)
        );
    }
}
