use aether_automata::symmetric::images;
use aether_automata::{
    AetherConfig, AetherValue, Automaton, Boundary, Coord, Seed, SimpleAether, SymmetricAether,
};
use num_bigint::BigInt;
use num_rational::BigRational;

/// Every image of every stored cell reads the same value.
fn assert_symmetric<A: Automaton>(engine: &A) {
    let origin = engine.origin();
    engine.for_each_cell(|coord, value| {
        let relative = coord.relative_to(&origin);
        for image in images(&relative) {
            let mirrored = image.shifted_by(&origin);
            assert_eq!(
                engine.value_at(&mirrored),
                *value,
                "step {}: {coord:?} vs {mirrored:?}",
                engine.step_number()
            );
        }
    });
}

#[test]
fn dense_single_source_stays_symmetric() {
    for seed in [1_000i64, -1_000, 7] {
        let mut engine = SimpleAether::new(3, Boundary::Unbounded, Seed::single(seed)).unwrap();
        for _ in 0..12 {
            engine.step();
            assert_symmetric(&engine);
        }
    }
    let mut boxed =
        SimpleAether::new(2, Boundary::Enclosed { side: 7 }, Seed::single(-4_321i64)).unwrap();
    for _ in 0..30 {
        boxed.step();
        assert_symmetric(&boxed);
    }
}

#[test]
fn expanded_canonical_storage_is_symmetric() {
    let mut engine = SymmetricAether::new(4, Boundary::Unbounded, Seed::single(50_000i64)).unwrap();
    for _ in 0..6 {
        engine.step();
    }
    assert_symmetric(&engine);
}

fn stays_on_one_side<V: AetherValue>(dimension: usize, value: V, steps: u64) {
    let negative = value.is_negative();
    let mut engine = SymmetricAether::new(dimension, Boundary::Unbounded, Seed::single(value)).unwrap();
    for _ in 0..steps {
        engine.step();
        let (min, max) = engine.min_max();
        if negative {
            assert!(max <= V::zero(), "{dimension}D max {max}");
        } else {
            assert!(min >= V::zero(), "{dimension}D min {min}");
        }
    }
}

#[test]
fn non_negative_source_never_goes_negative() {
    for dimension in 1..=4 {
        stays_on_one_side(dimension, 123_457i64, 20);
    }
    stays_on_one_side(5, BigInt::from(99_999), 8);
    stays_on_one_side(2, BigRational::from_integer(BigInt::from(1)), 10);
}

#[test]
fn negative_source_on_a_line_stays_non_positive() {
    stays_on_one_side(1, -123_457i64, 20);
    stays_on_one_side(1, BigRational::from_integer(BigInt::from(-1)), 20);
}

#[test]
fn negative_source_in_a_plane_overshoots() {
    // Each of the four zero neighbors pulls half the difference back.
    let mut engine = SymmetricAether::new(2, Boundary::Unbounded, Seed::single(-100i64)).unwrap();
    engine.step();
    assert_eq!(engine.value_at(&Coord::from([0, 0])), 100);
    assert_eq!(engine.value_at(&Coord::from([0, 1])), -50);
    assert_eq!(engine.total(), -100);
}

#[test]
fn weighted_total_is_the_seed() {
    let seed = BigInt::from(10).pow(30);
    let mut engine = SymmetricAether::new(3, Boundary::Unbounded, Seed::single(seed.clone())).unwrap();
    for _ in 0..15 {
        engine.step();
        assert_eq!(engine.total(), seed);
    }

    let one = BigRational::from_integer(BigInt::from(1));
    let mut engine = SymmetricAether::new(2, Boundary::Unbounded, Seed::single(one.clone())).unwrap();
    for _ in 0..12 {
        engine.step();
        assert_eq!(engine.total(), one);
    }

    let mut boxed =
        SymmetricAether::new(3, Boundary::Enclosed { side: 5 }, Seed::single(-9_000i32)).unwrap();
    for _ in 0..40 {
        boxed.step();
        assert_eq!(boxed.total(), -9_000);
    }
}

#[test]
fn enclosed_cube_settles() {
    let mut engine = SymmetricAether::new(3, Boundary::Enclosed { side: 3 }, Seed::single(-500i64)).unwrap();
    assert!(engine.settle(1_000));
    assert_eq!(engine.step_number(), 19);
    let settled: Vec<i64> = engine.canonical_cells().map(|(_, v)| *v).collect();
    assert!(!engine.step());
    let again: Vec<i64> = engine.canonical_cells().map(|(_, v)| *v).collect();
    assert_eq!(settled, again);
    assert_eq!(engine.total(), -500);
}

#[test]
fn canonical_storage_stays_small() {
    let mut engine = SymmetricAether::new(3, Boundary::Unbounded, Seed::single(1_000_000i64)).unwrap();
    engine.step_n(40);
    let reach = engine.reach();
    let side = 2 * reach + 1;
    assert!(engine.storage_len() * 20 < side.pow(3));
    assert_eq!(engine.capacity_extent(1).width(), side as u64);
    assert_eq!(engine.value_at(&Coord::from([reach as i64 + 1, 0, 0])), 0);
}

#[test]
fn worker_count_does_not_change_results() {
    let seed = Seed::single(-3_000_000i64);
    let mut serial =
        SymmetricAether::with_config(3, Boundary::Unbounded, seed.clone(), &AetherConfig::serial())
            .unwrap();
    let parallel_config = AetherConfig::default().thread_count(3).parallel_min_cells(0);
    let mut parallel = SymmetricAether::with_config(3, Boundary::Unbounded, seed, &parallel_config).unwrap();
    for _ in 0..30 {
        assert_eq!(serial.step(), parallel.step());
    }
    let a: Vec<_> = serial.canonical_cells().map(|(c, v)| (c, *v)).collect();
    let b: Vec<_> = parallel.canonical_cells().map(|(c, v)| (c, *v)).collect();
    assert_eq!(a, b);
}
