#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::time::{Duration, Instant};

use aether_automata::{
    AetherConfig, Automaton, Boundary, Coord, Seed, SimpleAether, SymmetricAether,
};

const DEFAULT_DIMENSION: usize = 3;
const DEFAULT_VALUE: i64 = 1_000_000;
const DEFAULT_STEPS: u64 = 400;
const CHECK_INTERVAL: u64 = 100;

struct MainArgs {
    config: AetherConfig,
    dimension: usize,
    value: i64,
    steps: u64,
    symmetric_only: bool,
}

fn parse_args() -> MainArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = MainArgs {
        config: AetherConfig::default(),
        dimension: DEFAULT_DIMENSION,
        value: DEFAULT_VALUE,
        steps: DEFAULT_STEPS,
        symmetric_only: false,
    };
    let next_arg = |i: usize, flag: &str| -> &str {
        args.get(i)
            .map(String::as_str)
            .unwrap_or_else(|| panic!("{flag} requires a value"))
    };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dimension" => {
                i += 1;
                parsed.dimension = next_arg(i, "--dimension")
                    .parse()
                    .expect("--dimension requires an integer between 1 and 5");
            }
            "--value" => {
                i += 1;
                parsed.value = next_arg(i, "--value")
                    .parse()
                    .expect("--value requires an integer");
            }
            "--steps" => {
                i += 1;
                parsed.steps = next_arg(i, "--steps")
                    .parse()
                    .expect("--steps requires a non-negative integer");
            }
            "--threads" => {
                i += 1;
                let n: usize = next_arg(i, "--threads")
                    .parse()
                    .expect("--threads requires a positive integer");
                parsed.config = parsed.config.thread_count(n);
            }
            "--max-threads" => {
                i += 1;
                let n: usize = next_arg(i, "--max-threads")
                    .parse()
                    .expect("--max-threads requires a positive integer");
                parsed.config = parsed.config.max_threads(n);
            }
            "--symmetric-only" => {
                parsed.symmetric_only = true;
            }
            other => panic!(
                "unknown argument: {other}\nusage: aether-automata [--dimension N] [--value V] [--steps N] [--threads N] [--max-threads N] [--symmetric-only]"
            ),
        }
        i += 1;
    }
    parsed
}

/// Compares every cell the dense engine stores against the symmetric one.
fn same_configuration(simple: &SimpleAether<i64>, symmetric: &SymmetricAether<i64>) -> bool {
    let mut same = true;
    simple.for_each_cell(|coord: &Coord, value| {
        if symmetric.value_at(coord) != *value {
            same = false;
        }
    });
    same
}

fn run_checked(args: &MainArgs) -> aether_automata::Result<()> {
    let seed = Seed::single(args.value);
    let mut simple = SimpleAether::with_config(
        args.dimension,
        Boundary::Unbounded,
        seed.clone(),
        &args.config,
    )?;
    let mut symmetric =
        SymmetricAether::with_config(args.dimension, Boundary::Unbounded, seed, &args.config)?;

    let mut simple_total = Duration::ZERO;
    let mut symmetric_total = Duration::ZERO;
    let mut done = 0;
    while done < args.steps {
        let chunk = CHECK_INTERVAL.min(args.steps - done);

        let start = Instant::now();
        let taken = simple.step_n(chunk);
        let simple_phase = start.elapsed();
        simple_total += simple_phase;
        done += taken;

        let start = Instant::now();
        symmetric.step_n(taken);
        let symmetric_phase = start.elapsed();
        symmetric_total += symmetric_phase;

        let match_status = if same_configuration(&simple, &symmetric) {
            "MATCH"
        } else {
            "MISMATCH"
        };
        let (min, max) = symmetric.min_max();
        println!(
            "Step {done}: side {} ({} cells) vs reach {} ({} canonical cells), values [{min}, {max}] [{match_status}]",
            simple.side(),
            simple.storage_len(),
            symmetric.reach(),
            symmetric.storage_len(),
        );
        println!(
            "  Simple: {:.3} ms | Symmetric: {:.3} ms",
            simple_phase.as_secs_f64() * 1000.0,
            symmetric_phase.as_secs_f64() * 1000.0
        );
        if taken < chunk {
            println!("Settled after {done} steps");
            break;
        }
    }

    let simple_ms = simple_total.as_secs_f64() * 1000.0;
    let symmetric_ms = symmetric_total.as_secs_f64() * 1000.0;
    println!("\n--- Summary ({done} steps, {}D, seed {}) ---", args.dimension, args.value);
    println!("Simple:    {simple_ms:.3} ms total");
    println!("Symmetric: {symmetric_ms:.3} ms total");
    println!(
        "Speedup (Simple / Symmetric): {:.2}x",
        simple_ms / symmetric_ms.max(f64::EPSILON)
    );
    Ok(())
}

fn run_symmetric(args: &MainArgs) -> aether_automata::Result<()> {
    let mut symmetric = SymmetricAether::with_config(
        args.dimension,
        Boundary::Unbounded,
        Seed::single(args.value),
        &args.config,
    )?;
    let start = Instant::now();
    symmetric.step_n(args.steps);
    let (min, max) = symmetric.min_max();
    println!(
        "{} steps in {:.3} ms: reach {}, values [{min}, {max}], total {}",
        symmetric.step_number(),
        start.elapsed().as_secs_f64() * 1000.0,
        symmetric.reach(),
        symmetric.total()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let args = parse_args();
    let result = if args.symmetric_only {
        run_symmetric(&args)
    } else {
        run_checked(&args)
    };
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
