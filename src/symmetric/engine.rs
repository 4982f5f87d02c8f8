//! Canonical-orthant engine for single-source grids.

use std::sync::Arc;

use super::layout::CanonicalLayout;
use super::multiplicity::{images, mirror_multiplicity, orbit_size};
use crate::automaton::{Automaton, Extent, ToppleObserver};
use crate::boundary::Boundary;
use crate::config::AetherConfig;
use crate::coord::{Coord, Direction, check_dimension};
use crate::error::{AetherError, Result};
use crate::grid::{Grid, Layout};
use crate::number::AetherValue;
use crate::parallel::Workers;
use crate::rule::Redistribution;
use crate::seed::Seed;

const ENGINE: &str = "symmetric aether";
const INITIAL_REACH: usize = 2;

/// One canonical cell's topple: the value each of its images keeps and
/// what each of them sends to every canonical target.
struct CanonicalTopple<V> {
    retained: V,
    toppled: bool,
    transfers: Vec<(Coord, V)>,
}

/// Mirror images share one value, so each canonical cell topples once and
/// its shares are credited to the canonical representative of every
/// neighbor, weighted by [`mirror_multiplicity`].
fn redistribute<V: AetherValue>(
    grid: &Grid<V, CanonicalLayout>,
    limit: Option<i64>,
    scratch: &mut Redistribution<V>,
    index: usize,
) -> CanonicalTopple<V> {
    let layout = grid.layout();
    let coord = layout.coord_of(index);
    let value = grid.at(index);
    let zero = V::zero();
    scratch.clear();
    for direction in Direction::all(layout.dimension()) {
        let neighbor = coord.step(direction);
        if let Some(limit) = limit {
            if neighbor.get(direction.axis()).abs() > limit {
                continue;
            }
        }
        let neighbor_value = match layout.index_of(&neighbor.canonical()) {
            Some(at) => grid.at(at),
            None => &zero,
        };
        scratch.offer(direction, neighbor_value, value);
    }
    let outcome = scratch.resolve(value.clone());
    if !outcome.toppled {
        return CanonicalTopple {
            retained: outcome.retained,
            toppled: false,
            transfers: Vec::new(),
        };
    }

    // Directions folding onto the same target sit in the same value group
    // and carry equal shares.
    let mut grouped: Vec<(Coord, &V, u64)> = Vec::with_capacity(scratch.len());
    for (direction, share) in scratch.shares() {
        let target = coord.step(direction).canonical();
        match grouped.iter_mut().find(|(seen, _, _)| *seen == target) {
            Some((_, _, directions)) => *directions += 1,
            None => grouped.push((target, share, 1)),
        }
    }
    let transfers = grouped
        .into_iter()
        .map(|(target, share, directions)| {
            let amount = share.times(mirror_multiplicity(&coord, &target, directions));
            (target, amount)
        })
        .collect();
    CanonicalTopple {
        retained: outcome.retained,
        toppled: true,
        transfers,
    }
}

/// Aether automaton seeded by a single source, storing only the canonical
/// orthant around it.
///
/// Supports [`Boundary::Unbounded`] (source at the origin) and
/// [`Boundary::Enclosed`] with an odd side (source at the centre, box
/// coordinates `[0, side)`). Values match [`crate::simple::SimpleAether`]
/// cell for cell.
pub struct SymmetricAether<V: AetherValue> {
    grid: Grid<V, CanonicalLayout>,
    boundary: Boundary,
    /// Model coordinate of the symmetry centre.
    centre: Coord,
    /// Largest relative coordinate inside an enclosed box.
    limit: Option<i64>,
    step_number: u64,
    changed: Option<bool>,
    bounds_reached: bool,
    workers: Workers,
}

impl<V: AetherValue> SymmetricAether<V> {
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
        let Seed::SingleSource { value, position } = seed else {
            return Err(AetherError::UnsupportedSeed { engine: ENGINE });
        };

        let (centre, limit, reach) = match boundary {
            Boundary::Unbounded => (Coord::origin(dimension), None, INITIAL_REACH),
            Boundary::Enclosed { side } => {
                if side % 2 == 0 {
                    return Err(AetherError::EvenSide(side));
                }
                let half = (side - 1) / 2;
                (Coord::splat(dimension, half as i64), Some(half as i64), half)
            }
            Boundary::Toroidal { .. } => {
                return Err(AetherError::UnsupportedBoundary {
                    engine: ENGINE,
                    boundary: boundary.to_string(),
                });
            }
        };
        if let Some(position) = position {
            if position != centre {
                return Err(AetherError::OffCentreSource {
                    coords: position.as_slice().to_vec(),
                });
            }
        }

        let mut grid = Grid::zeroed(Arc::new(CanonicalLayout::new(dimension, reach)));
        grid.set(0, value);
        log::debug!(
            "{ENGINE}: {dimension}D {boundary:?}, {} canonical cells",
            grid.len()
        );
        Ok(Self {
            grid,
            boundary,
            centre,
            limit,
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

    /// Largest distance from the centre stored on any axis.
    #[inline]
    pub fn reach(&self) -> usize {
        self.grid.layout().reach()
    }

    #[inline]
    pub fn growth_pending(&self) -> bool {
        self.bounds_reached
    }

    /// Canonical cells with their values, in storage order.
    pub fn canonical_cells(&self) -> impl Iterator<Item = (Coord, &V)> + '_ {
        let layout = self.grid.layout();
        self.grid
            .cells()
            .iter()
            .enumerate()
            .map(move |(index, value)| (layout.coord_of(index), value))
    }

    /// Canonical coordinate relative to the centre, or `None` outside an
    /// enclosed box.
    fn fold(&self, coord: &Coord) -> Option<Coord> {
        let relative = coord.relative_to(&self.centre);
        match self.limit {
            Some(limit) if relative.max_abs() > limit => None,
            _ => Some(relative.canonical()),
        }
    }
}

impl<V: AetherValue> Automaton for SymmetricAether<V> {
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
        self.centre
    }

    fn value_at(&self, coord: &Coord) -> V {
        debug_assert_eq!(coord.dimension(), self.dimension());
        self.fold(coord)
            .and_then(|canonical| self.grid.get(&canonical))
            .cloned()
            .unwrap_or_else(V::zero)
    }

    fn capacity_extent(&self, axis: usize) -> Extent {
        let reach = self.reach() as i64;
        let centre = self.centre.get(axis);
        Extent::new(centre - reach, centre + reach)
    }

    fn occupied_extent(&self, axis: usize) -> Option<Extent> {
        // Canonical coordinates put the largest axis first, and every axis
        // is a permutation away from it.
        let (_, reach) = self.grid.occupied_range(0)?;
        let centre = self.centre.get(axis);
        Some(Extent::new(centre - reach, centre + reach))
    }

    #[inline]
    fn storage_len(&self) -> usize {
        self.grid.len()
    }

    fn storage_index(&self, coord: &Coord) -> Option<usize> {
        self.fold(coord)
            .and_then(|canonical| self.grid.layout().index_of(&canonical))
    }

    fn step_with<O: ToppleObserver>(&mut self, observer: &mut O) -> bool {
        let grow = std::mem::take(&mut self.bounds_reached);
        let current = Arc::clone(self.grid.layout());
        let next_layout = if grow {
            Arc::new(current.grown())
        } else {
            Arc::clone(&current)
        };
        let centre = self.centre;

        let mut next = Grid::zeroed(Arc::clone(&next_layout));
        observer.begin_step(next.len(), grow);
        if grow {
            log::debug!(
                "step {}: canonical reach grows to {}",
                self.step_number + 1,
                next_layout.reach()
            );
            // Ranks are stable, so new cells are exactly the tail.
            for index in current.len()..next_layout.len() {
                let coord = next_layout.coord_of(index);
                observer.register_edge(index, &coord.shifted_by(&centre));
            }
        }

        let limit = self.limit;
        let grid = &self.grid;
        let topples = self
            .workers
            .map_cells(grid.len(), Redistribution::new, |scratch, index| {
                redistribute(grid, limit, scratch, index)
            });

        let watch_edges = limit.is_none();
        let near_edge = next_layout.reach() as i64 - 1;
        let mut changed = false;
        let mut reached = false;
        for (index, cell) in topples.into_iter().enumerate() {
            let coord = current.coord_of(index);
            if cell.toppled {
                changed = true;
                if watch_edges && coord.get(0) >= near_edge {
                    reached = true;
                }
                for (target, amount) in &cell.transfers {
                    if watch_edges && target.get(0) >= near_edge {
                        reached = true;
                    }
                    match next_layout.index_of(target) {
                        Some(at) => next.add_at(at, amount),
                        None => {
                            debug_assert!(false, "transfer left storage at {target:?}");
                            log::error!("transfer {amount} left storage at {target:?}");
                        }
                    }
                }
            }
            next.add_at(index, &cell.retained);
            observer.record(index, &coord.shifted_by(&centre), cell.toppled);
        }

        self.grid = next;
        self.bounds_reached = reached;
        self.step_number += 1;
        self.changed = Some(changed);
        log::trace!(
            "step {}: changed={changed}, reach {}",
            self.step_number,
            self.reach()
        );
        changed
    }

    fn total(&self) -> V {
        let mut total = V::zero();
        for (coord, value) in self.canonical_cells() {
            total.add_assign_ref(&value.times(orbit_size(&coord)));
        }
        total
    }

    fn min_max(&self) -> (V, V) {
        self.grid
            .min_max()
            .unwrap_or_else(|| (V::zero(), V::zero()))
    }

    fn for_each_cell<F: FnMut(&Coord, &V)>(&self, mut f: F) {
        for (coord, value) in self.canonical_cells() {
            for image in images(&coord) {
                f(&image.shifted_by(&self.centre), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use super::SymmetricAether;
    use crate::automaton::{Automaton, Extent};
    use crate::boundary::Boundary;
    use crate::coord::Coord;
    use crate::error::AetherError;
    use crate::seed::Seed;

    #[test]
    fn plane_source_after_two_steps() {
        let mut engine = SymmetricAether::new(2, Boundary::Unbounded, Seed::single(100i64)).unwrap();
        engine.step();
        assert_eq!(engine.value_at(&Coord::from([0, 0])), 20);
        assert_eq!(engine.value_at(&Coord::from([0, -1])), 20);
        engine.step();
        let expected = [
            ([0, 0], 20),
            ([1, 0], 5),
            ([0, -1], 5),
            ([1, 1], 10),
            ([-1, 1], 10),
            ([2, 0], 5),
            ([0, -2], 5),
            ([2, 1], 0),
        ];
        for (coord, value) in expected {
            assert_eq!(engine.value_at(&Coord::from(coord)), value, "{coord:?}");
        }
        assert_eq!(engine.total(), 100);
        assert_eq!(engine.occupied_extent(1), Some(Extent::new(-2, 2)));
    }

    #[test]
    fn enclosed_box_is_addressed_from_its_corner() {
        let engine = SymmetricAether::new(
            3,
            Boundary::Enclosed { side: 5 },
            Seed::single(BigInt::from(-40)),
        )
        .unwrap();
        assert_eq!(engine.origin(), Coord::from([2, 2, 2]));
        assert_eq!(engine.value_at(&Coord::from([2, 2, 2])), BigInt::from(-40));
        assert_eq!(engine.value_at(&Coord::from([5, 2, 2])), BigInt::from(0));
        assert_eq!(engine.capacity_extent(2), Extent::new(0, 4));
        assert_eq!(engine.storage_len(), 10);
    }

    #[test]
    fn rejects_what_symmetry_cannot_express() {
        assert!(matches!(
            SymmetricAether::new(2, Boundary::Enclosed { side: 4 }, Seed::single(1i64)),
            Err(AetherError::EvenSide(4))
        ));
        assert!(matches!(
            SymmetricAether::new(2, Boundary::Toroidal { side: 5 }, Seed::single(1i64)),
            Err(AetherError::UnsupportedBoundary { .. })
        ));
        assert!(matches!(
            SymmetricAether::<i64>::new(2, Boundary::Unbounded, Seed::random_block(2, 0, 5, 1)),
            Err(AetherError::UnsupportedSeed { .. })
        ));
        assert!(matches!(
            SymmetricAether::new(1, Boundary::Unbounded, Seed::single_at(1i64, [1])),
            Err(AetherError::OffCentreSource { .. })
        ));
    }
}
