//! The stepping interface shared by every engine and tracker.

use crate::coord::Coord;
use crate::number::AetherValue;

/// Inclusive coordinate range on one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    pub min: i64,
    pub max: i64,
}

impl Extent {
    #[inline]
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Number of coordinates covered; zero when `min > max`.
    #[inline]
    pub fn width(&self) -> u64 {
        if self.min > self.max {
            0
        } else {
            (self.max - self.min) as u64 + 1
        }
    }
}

/// Per-cell hook into a step.
///
/// Indices are storage indices of the generation being written, so an
/// observer can keep a parallel array sized by `begin_step`. Coordinates are
/// in the automaton's model space (for symmetric engines, the canonical
/// representative).
pub trait ToppleObserver {
    /// Called once before any other callback of a step. `grew` is true when
    /// storage was enlarged for this step; indices from the previous step
    /// are then no longer valid.
    fn begin_step(&mut self, cells: usize, grew: bool) {
        let _ = (cells, grew);
    }

    /// Called for each cell added by growth, before any `record` call.
    fn register_edge(&mut self, index: usize, coord: &Coord) {
        let _ = (index, coord);
    }

    /// Called once for every stored cell of the previous generation.
    fn record(&mut self, index: usize, coord: &Coord, toppled: bool);
}

impl ToppleObserver for () {
    #[inline(always)]
    fn record(&mut self, _index: usize, _coord: &Coord, _toppled: bool) {}
}

/// A cellular automaton evolving under the Aether rule.
pub trait Automaton {
    type Value: AetherValue;

    /// Number of axes, `1..=5`.
    fn dimension(&self) -> usize;

    /// Generations computed so far; starts at zero.
    fn step_number(&self) -> u64;

    /// Whether the last step changed the configuration. `None` before the
    /// first step.
    fn changed(&self) -> Option<bool>;

    /// Model coordinate of the seed position, or the block centre for a
    /// random block. Alternation parity is measured from here. On unbounded
    /// grids model coordinates stay relative to the coordinate origin, so a
    /// positioned source reports its own position.
    fn origin(&self) -> Coord;

    /// Value of a cell. Cells outside storage read as zero.
    fn value_at(&self, coord: &Coord) -> Self::Value;

    /// Range of coordinates on `axis` that storage covers.
    fn capacity_extent(&self, axis: usize) -> Extent;

    /// Range of coordinates on `axis` holding a nonzero value, `None` when
    /// the configuration is all zero.
    fn occupied_extent(&self, axis: usize) -> Option<Extent>;

    /// Number of stored cells in the current generation.
    fn storage_len(&self) -> usize;

    /// Storage index of a model coordinate, as passed to observers.
    fn storage_index(&self, coord: &Coord) -> Option<usize>;

    /// Advances one generation, reporting every cell to `observer`. Returns
    /// whether anything changed.
    fn step_with<O: ToppleObserver>(&mut self, observer: &mut O) -> bool;

    /// Sum over the whole conceptual grid.
    fn total(&self) -> Self::Value;

    /// Smallest and largest value over the conceptual grid, counting the
    /// implicit zeros of an unbounded grid.
    fn min_max(&self) -> (Self::Value, Self::Value);

    /// Visits every stored cell of the conceptual grid, expanding symmetric
    /// storage into all mirror images.
    fn for_each_cell<F: FnMut(&Coord, &Self::Value)>(&self, f: F);

    fn step(&mut self) -> bool {
        self.step_with(&mut ())
    }

    /// Runs up to `n` steps, stopping early once a step changes nothing.
    /// Returns the number of steps taken.
    fn step_n(&mut self, n: u64) -> u64 {
        for taken in 0..n {
            if !self.step() {
                return taken + 1;
            }
        }
        n
    }

    /// Steps until the configuration stops changing or `limit` steps have
    /// run. Returns true when a fixed point was reached.
    fn settle(&mut self, limit: u64) -> bool {
        for _ in 0..limit {
            if !self.step() {
                return true;
            }
        }
        false
    }
}
