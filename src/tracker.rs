//! Per-cell instrumentation layered over any [`Automaton`].
//!
//! Trackers keep flat boolean arrays indexed by the wrapped automaton's
//! storage indices and fill them through the [`ToppleObserver`] hook, so
//! they work unchanged over dense and canonical storage. They nest: the
//! observer passed to an outer tracker's `step_with` is forwarded inwards.

use crate::automaton::{Automaton, Extent, ToppleObserver};
use crate::coord::Coord;
use crate::number::AetherValue;

macro_rules! delegate_automaton {
    () => {
        type Value = A::Value;

        #[inline]
        fn dimension(&self) -> usize {
            self.inner.dimension()
        }

        #[inline]
        fn step_number(&self) -> u64 {
            self.inner.step_number()
        }

        #[inline]
        fn changed(&self) -> Option<bool> {
            self.inner.changed()
        }

        #[inline]
        fn origin(&self) -> Coord {
            self.inner.origin()
        }

        #[inline]
        fn value_at(&self, coord: &Coord) -> A::Value {
            self.inner.value_at(coord)
        }

        #[inline]
        fn capacity_extent(&self, axis: usize) -> Extent {
            self.inner.capacity_extent(axis)
        }

        #[inline]
        fn occupied_extent(&self, axis: usize) -> Option<Extent> {
            self.inner.occupied_extent(axis)
        }

        #[inline]
        fn storage_len(&self) -> usize {
            self.inner.storage_len()
        }

        #[inline]
        fn storage_index(&self, coord: &Coord) -> Option<usize> {
            self.inner.storage_index(coord)
        }

        #[inline]
        fn total(&self) -> A::Value {
            self.inner.total()
        }

        #[inline]
        fn min_max(&self) -> (A::Value, A::Value) {
            self.inner.min_max()
        }

        #[inline]
        fn for_each_cell<F: FnMut(&Coord, &A::Value)>(&self, f: F) {
            self.inner.for_each_cell(f)
        }
    };
}

/// Records which cells toppled in the most recent step.
pub struct Topplings<A> {
    inner: A,
    toppled: Vec<bool>,
}

impl<A: Automaton> Topplings<A> {
    pub fn new(inner: A) -> Self {
        let toppled = vec![false; inner.storage_len()];
        Self { inner, toppled }
    }

    #[inline]
    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }

    /// Whether the cell toppled in the last step. False before the first
    /// step and outside storage.
    pub fn toppled_at(&self, coord: &Coord) -> bool {
        self.inner
            .storage_index(coord)
            .and_then(|index| self.toppled.get(index).copied())
            .unwrap_or(false)
    }

    /// Flags in storage order.
    #[inline]
    pub fn flags(&self) -> &[bool] {
        &self.toppled
    }

    /// Number of stored cells that toppled in the last step.
    pub fn toppled_count(&self) -> usize {
        self.toppled.iter().filter(|&&t| t).count()
    }
}

struct RecordTopplings<'a, O> {
    toppled: &'a mut Vec<bool>,
    outer: &'a mut O,
}

impl<O: ToppleObserver> ToppleObserver for RecordTopplings<'_, O> {
    fn begin_step(&mut self, cells: usize, grew: bool) {
        self.toppled.clear();
        self.toppled.resize(cells, false);
        self.outer.begin_step(cells, grew);
    }

    fn register_edge(&mut self, index: usize, coord: &Coord) {
        self.outer.register_edge(index, coord);
    }

    #[inline]
    fn record(&mut self, index: usize, coord: &Coord, toppled: bool) {
        self.toppled[index] = toppled;
        self.outer.record(index, coord, toppled);
    }
}

impl<A: Automaton> Automaton for Topplings<A> {
    delegate_automaton!();

    fn step_with<O: ToppleObserver>(&mut self, observer: &mut O) -> bool {
        let mut recorder = RecordTopplings {
            toppled: &mut self.toppled,
            outer: observer,
        };
        self.inner.step_with(&mut recorder)
    }
}

/// Checks every cell against a checkerboard schedule: on a given step the
/// cells whose coordinate sum (relative to the origin) is even are expected
/// to topple and the odd ones to rest, or the reverse, alternating each
/// step.
pub struct ToppleAlternation<A> {
    inner: A,
    compliant: Vec<bool>,
    even_turn: bool,
    origin: Coord,
}

impl<A: Automaton> ToppleAlternation<A> {
    /// Even cells go first when the value at the origin is non-negative.
    pub fn new(inner: A) -> Self {
        let origin = inner.origin();
        let even_first = !inner.value_at(&origin).is_negative();
        Self::with_even_first(inner, even_first)
    }

    pub fn with_even_first(inner: A, even_first: bool) -> Self {
        let origin = inner.origin();
        let compliant = vec![false; inner.storage_len()];
        Self {
            inner,
            compliant,
            even_turn: even_first,
            origin,
        }
    }

    #[inline]
    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }

    /// Whether even cells are expected to topple in the next step.
    #[inline]
    pub fn even_turn(&self) -> bool {
        self.even_turn
    }

    /// Whether the cell matched its schedule in the last step. `None` before
    /// the first step and outside storage.
    pub fn complies_at(&self, coord: &Coord) -> Option<bool> {
        if self.inner.step_number() == 0 {
            return None;
        }
        let index = self.inner.storage_index(coord)?;
        self.compliant.get(index).copied()
    }

    /// Whether every stored cell matched its schedule in the last step.
    pub fn fully_compliant(&self) -> bool {
        self.inner.step_number() > 0 && self.compliant.iter().all(|&c| c)
    }

    /// Flags in storage order.
    #[inline]
    pub fn flags(&self) -> &[bool] {
        &self.compliant
    }
}

struct RecordAlternation<'a, O> {
    compliant: &'a mut Vec<bool>,
    even_turn: bool,
    origin: Coord,
    outer: &'a mut O,
}

impl<O> RecordAlternation<'_, O> {
    #[inline]
    fn expected(&self, coord: &Coord) -> bool {
        self.even_turn == coord.relative_to(&self.origin).is_even()
    }
}

impl<O: ToppleObserver> ToppleObserver for RecordAlternation<'_, O> {
    fn begin_step(&mut self, cells: usize, grew: bool) {
        self.compliant.clear();
        self.compliant.resize(cells, false);
        self.outer.begin_step(cells, grew);
    }

    /// Cells exposed by growth were never stepped, so they comply exactly
    /// when they were not expected to topple.
    fn register_edge(&mut self, index: usize, coord: &Coord) {
        self.compliant[index] = !self.expected(coord);
        self.outer.register_edge(index, coord);
    }

    #[inline]
    fn record(&mut self, index: usize, coord: &Coord, toppled: bool) {
        self.compliant[index] = toppled == self.expected(coord);
        self.outer.record(index, coord, toppled);
    }
}

impl<A: Automaton> Automaton for ToppleAlternation<A> {
    delegate_automaton!();

    fn step_with<O: ToppleObserver>(&mut self, observer: &mut O) -> bool {
        let mut recorder = RecordAlternation {
            compliant: &mut self.compliant,
            even_turn: self.even_turn,
            origin: self.origin,
            outer: observer,
        };
        let changed = self.inner.step_with(&mut recorder);
        self.even_turn = !self.even_turn;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::{ToppleAlternation, Topplings};
    use crate::automaton::Automaton;
    use crate::boundary::Boundary;
    use crate::coord::Coord;
    use crate::seed::Seed;
    use crate::simple::SimpleAether;

    #[test]
    fn topplings_follow_the_last_step() {
        let engine = SimpleAether::new(1, Boundary::Unbounded, Seed::single(9i64)).unwrap();
        let mut tracked = Topplings::new(engine);
        assert!(!tracked.toppled_at(&Coord::from([0])));
        tracked.step();
        assert!(tracked.toppled_at(&Coord::from([0])));
        assert_eq!(tracked.toppled_count(), 1);
        tracked.step();
        assert!(tracked.toppled_at(&Coord::from([-1])));
        assert!(tracked.toppled_at(&Coord::from([1])));
        assert!(!tracked.toppled_at(&Coord::from([0])));
        assert_eq!(tracked.flags().len(), tracked.storage_len());
    }

    #[test]
    fn negative_seed_starts_with_odd_turn() {
        let engine = SimpleAether::new(2, Boundary::Unbounded, Seed::single(-5i64)).unwrap();
        let tracked = ToppleAlternation::new(engine);
        assert!(!tracked.even_turn());
        assert_eq!(tracked.complies_at(&Coord::from([0, 0])), None);
    }
}
