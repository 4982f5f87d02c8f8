use std::time::Instant;

use aether_automata::number::approximate;
use aether_automata::{AetherValue, Automaton, Boundary, Seed, SymmetricAether};
use num_bigint::BigInt;
use num_rational::BigRational;

const DIMENSION: usize = 2;
const STEPS: u64 = 150;

fn bench<V: AetherValue>(label: &str, value: V) {
    let mut engine = SymmetricAether::new(DIMENSION, Boundary::Unbounded, Seed::single(value))
        .expect("seed fits the value type");
    let start = Instant::now();
    engine.step_n(STEPS);
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    let (min, max) = engine.min_max();
    println!(
        "{:<12} {:>12.1} {:>10.4} {:>14.6} {:>14.6}",
        label,
        total_ms,
        total_ms / STEPS as f64,
        approximate(&min),
        approximate(&max)
    );
}

fn main() {
    println!(
        "{:<12} {:>12} {:>10} {:>14} {:>14}",
        "Type", "Total(ms)", "Avg(ms)", "Min", "Max"
    );
    println!("{}", "-".repeat(66));

    bench("i16", i16::MAX);
    bench("i32", 1_000_000i32);
    bench("i64", 1_000_000i64);
    bench("BigInt", BigInt::from(1_000_000));
    // Exact shares of a unit source; denominators grow every step.
    bench("BigRational", BigRational::from_integer(BigInt::from(1)));
}
