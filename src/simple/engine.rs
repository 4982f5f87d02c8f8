//! Dense full-grid engine.

use std::sync::Arc;

use super::layout::{DenseLayout, Neighbor};
use crate::automaton::{Automaton, Extent, ToppleObserver};
use crate::boundary::Boundary;
use crate::config::AetherConfig;
use crate::coord::{Coord, Direction, check_dimension};
use crate::error::{AetherError, Result};
use crate::grid::{Grid, Layout};
use crate::number::AetherValue;
use crate::parallel::Workers;
use crate::rule::Redistribution;
use crate::seed::{Seed, random_block_values};

/// Side of a fresh unbounded grid around a single source: the source plus a
/// margin of two on each end.
const INITIAL_MARGIN: usize = 2;

struct CellTopple<V> {
    retained: V,
    toppled: bool,
    shares: Vec<(Direction, V)>,
}

impl<V: AetherValue> CellTopple<V> {
    /// Reads the result of the last `resolve` out of `scratch`.
    fn collect(scratch: &Redistribution<V>, retained: V, toppled: bool) -> Self {
        let shares = if toppled {
            scratch
                .shares()
                .map(|(direction, share)| (direction, share.clone()))
                .collect()
        } else {
            Vec::new()
        };
        Self {
            retained,
            toppled,
            shares,
        }
    }
}

fn redistribute<V: AetherValue>(
    grid: &Grid<V, DenseLayout>,
    boundary: Boundary,
    scratch: &mut Redistribution<V>,
    index: usize,
) -> CellTopple<V> {
    let layout = grid.layout();
    let coord = layout.coord_of(index);
    let value = grid.at(index);
    let zero = V::zero();
    scratch.clear();
    for direction in Direction::all(layout.dimension()) {
        match layout.neighbor(boundary, &coord, direction) {
            Neighbor::Stored(neighbor) => scratch.offer(direction, grid.at(neighbor), value),
            Neighbor::Beyond => scratch.offer(direction, &zero, value),
            Neighbor::Missing => {}
        }
    }
    let outcome = scratch.resolve(value.clone());
    CellTopple::collect(scratch, outcome.retained, outcome.toppled)
}

/// Aether automaton over a dense box, for every boundary policy and seed.
///
/// Slower and larger than [`crate::symmetric::SymmetricAether`] but makes no
/// symmetry assumption, so it doubles as the reference for it.
pub struct SimpleAether<V: AetherValue> {
    grid: Grid<V, DenseLayout>,
    boundary: Boundary,
    /// Layout coordinate of model coordinate zero, on every axis.
    origin_offset: i64,
    source: Coord,
    step_number: u64,
    changed: Option<bool>,
    bounds_reached: bool,
    workers: Workers,
}

impl<V: AetherValue> SimpleAether<V> {
    pub fn new(dimension: usize, boundary: Boundary, seed: Seed<V>) -> Result<Self> {
        Self::with_config(dimension, boundary, seed, &AetherConfig::default())
    }

    pub fn with_config(
        dimension: usize,
        boundary: Boundary,
        seed: Seed<V>,
        config: &AetherConfig,
    ) -> Result<Self> {
        check_dimension(dimension)?;
        boundary.validate()?;
        seed.validate(dimension)?;

        let (grid, origin_offset, source) = match (boundary.side(), seed) {
            (None, Seed::SingleSource { value, position }) => {
                let source = position.unwrap_or_else(|| Coord::origin(dimension));
                let reach = source.max_abs() as usize + INITIAL_MARGIN;
                let offset = reach as i64;
                let mut grid = Grid::zeroed(Arc::new(DenseLayout::new(dimension, 2 * reach + 1)));
                place(&mut grid, &source.shifted(offset), value);
                (grid, offset, source)
            }
            (
                None,
                Seed::RandomBlock {
                    side: block,
                    min,
                    max,
                    rng_seed,
                },
            ) => {
                let side = block + 2 * INITIAL_MARGIN;
                let mut grid = Grid::zeroed(Arc::new(DenseLayout::new(dimension, side)));
                let values = random_block_values(dimension, block, min, max, rng_seed)?;
                fill_block(&mut grid, block, INITIAL_MARGIN as i64, values);
                (grid, (side as i64 - 1) / 2, Coord::origin(dimension))
            }
            (Some(side), Seed::SingleSource { value, position }) => {
                let source =
                    position.unwrap_or_else(|| Coord::splat(dimension, (side as i64 - 1) / 2));
                if source.as_slice().iter().any(|c| !(0..side as i64).contains(c)) {
                    return Err(AetherError::SourceOutOfBounds {
                        coords: source.as_slice().to_vec(),
                        side,
                    });
                }
                let mut grid = Grid::zeroed(Arc::new(DenseLayout::new(dimension, side)));
                place(&mut grid, &source, value);
                (grid, 0, source)
            }
            (
                Some(side),
                Seed::RandomBlock {
                    side: block,
                    min,
                    max,
                    rng_seed,
                },
            ) => {
                if block > side {
                    return Err(AetherError::BlockDoesNotFit { block, side });
                }
                let mut grid = Grid::zeroed(Arc::new(DenseLayout::new(dimension, side)));
                let values = random_block_values(dimension, block, min, max, rng_seed)?;
                fill_block(&mut grid, block, ((side - block) / 2) as i64, values);
                (grid, 0, Coord::splat(dimension, (side as i64 - 1) / 2))
            }
        };

        log::debug!(
            "simple aether: {dimension}D {boundary:?}, side {}, source {source:?}",
            grid.layout().side()
        );
        Ok(Self {
            grid,
            boundary,
            origin_offset,
            source,
            step_number: 0,
            changed: None,
            bounds_reached: false,
            workers: Workers::new(config)?,
        })
    }

    #[inline]
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Current side of the stored box.
    #[inline]
    pub fn side(&self) -> usize {
        self.grid.layout().side()
    }

    /// Whether the next step will enlarge storage.
    #[inline]
    pub fn growth_pending(&self) -> bool {
        self.bounds_reached
    }

    /// Stored cells in row-major layout order.
    #[inline]
    pub fn cells(&self) -> &[V] {
        self.grid.cells()
    }

    #[inline]
    fn to_layout(&self, coord: &Coord) -> Coord {
        coord.shifted(self.origin_offset)
    }
}

fn place<V: AetherValue>(grid: &mut Grid<V, DenseLayout>, coord: &Coord, value: V) {
    if let Some(index) = grid.layout().index_of(coord) {
        grid.set(index, value);
    }
}

fn fill_block<V: AetherValue>(
    grid: &mut Grid<V, DenseLayout>,
    block: usize,
    start: i64,
    values: Vec<V>,
) {
    let block_layout = DenseLayout::new(grid.layout().dimension(), block);
    for (index, value) in values.into_iter().enumerate() {
        let coord = block_layout.coord_of(index).shifted(start);
        place(grid, &coord, value);
    }
}

impl<V: AetherValue> Automaton for SimpleAether<V> {
    type Value = V;

    #[inline]
    fn dimension(&self) -> usize {
        self.grid.layout().dimension()
    }

    #[inline]
    fn step_number(&self) -> u64 {
        self.step_number
    }

    #[inline]
    fn changed(&self) -> Option<bool> {
        self.changed
    }

    #[inline]
    fn origin(&self) -> Coord {
        self.source
    }

    fn value_at(&self, coord: &Coord) -> V {
        debug_assert_eq!(coord.dimension(), self.dimension());
        self.grid
            .get(&self.to_layout(coord))
            .cloned()
            .unwrap_or_else(V::zero)
    }

    fn capacity_extent(&self, _axis: usize) -> Extent {
        Extent::new(-self.origin_offset, self.side() as i64 - 1 - self.origin_offset)
    }

    fn occupied_extent(&self, axis: usize) -> Option<Extent> {
        self.grid
            .occupied_range(axis)
            .map(|(lo, hi)| Extent::new(lo - self.origin_offset, hi - self.origin_offset))
    }

    #[inline]
    fn storage_len(&self) -> usize {
        self.grid.len()
    }

    fn storage_index(&self, coord: &Coord) -> Option<usize> {
        self.grid.layout().index_of(&self.to_layout(coord))
    }

    fn step_with<O: ToppleObserver>(&mut self, observer: &mut O) -> bool {
        let grow = std::mem::take(&mut self.bounds_reached);
        let current = Arc::clone(self.grid.layout());
        let (next_layout, shift) = if grow {
            (Arc::new(current.grown(1)), 1)
        } else {
            (Arc::clone(&current), 0)
        };
        if grow {
            self.origin_offset += 1;
            log::debug!(
                "step {}: grid grows to side {}",
                self.step_number + 1,
                next_layout.side()
            );
        }
        let origin_offset = self.origin_offset;

        let mut next = Grid::zeroed(Arc::clone(&next_layout));
        observer.begin_step(next.len(), grow);
        if grow {
            for index in 0..next_layout.len() {
                let coord = next_layout.coord_of(index);
                if next_layout.distance_to_edge(&coord) == 0 {
                    observer.register_edge(index, &coord.shifted(-origin_offset));
                }
            }
        }

        let boundary = self.boundary;
        let grid = &self.grid;
        let topples = self
            .workers
            .map_cells(grid.len(), Redistribution::new, |scratch, index| {
                redistribute(grid, boundary, scratch, index)
            });

        let watch_edges = boundary.is_unbounded();
        let mut changed = false;
        let mut reached = false;
        for (index, cell) in topples.into_iter().enumerate() {
            let coord = current.coord_of(index).shifted(shift);
            let Some(target) = next_layout.index_of(&coord) else {
                continue;
            };
            if cell.toppled {
                changed = true;
                if watch_edges && next_layout.distance_to_edge(&coord) <= 1 {
                    reached = true;
                }
                for (direction, share) in &cell.shares {
                    match next_layout.neighbor(boundary, &coord, *direction) {
                        Neighbor::Stored(neighbor) => {
                            if watch_edges
                                && next_layout.distance_to_edge(&coord.step(*direction)) <= 1
                            {
                                reached = true;
                            }
                            next.add_at(neighbor, share);
                        }
                        Neighbor::Beyond | Neighbor::Missing => {
                            debug_assert!(false, "share left storage at {coord:?}");
                            log::error!("share {share} left storage at {coord:?}");
                        }
                    }
                }
            }
            next.add_at(target, &cell.retained);
            observer.record(target, &coord.shifted(-origin_offset), cell.toppled);
        }

        self.grid = next;
        self.bounds_reached = reached;
        self.step_number += 1;
        self.changed = Some(changed);
        log::trace!(
            "step {}: changed={changed}, side {}",
            self.step_number,
            self.side()
        );
        changed
    }

    fn total(&self) -> V {
        self.grid.stored_total()
    }

    fn min_max(&self) -> (V, V) {
        self.grid
            .min_max()
            .unwrap_or_else(|| (V::zero(), V::zero()))
    }

    fn for_each_cell<F: FnMut(&Coord, &V)>(&self, mut f: F) {
        let layout = self.grid.layout();
        for (index, value) in self.grid.cells().iter().enumerate() {
            f(&layout.coord_of(index).shifted(-self.origin_offset), value);
        }
    }
}
