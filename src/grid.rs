//! Flat cell storage addressed through a layout.
//!
//! A layout maps layout-space coordinates to dense storage indices and back.
//! The simple engines use a full box ([`crate::simple::DenseLayout`]), the
//! symmetric engines only store the canonical orthant
//! ([`crate::symmetric::CanonicalLayout`]). Layouts are shared between
//! consecutive generations through an `Arc` until the grid grows.

use std::sync::Arc;

use crate::coord::Coord;
use crate::number::AetherValue;

pub trait Layout: Send + Sync {
    fn dimension(&self) -> usize;

    /// Number of stored cells.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage index of `coord`, or `None` when the layout does not store it.
    fn index_of(&self, coord: &Coord) -> Option<usize>;

    /// Layout-space coordinate of a storage index. `index < len()`.
    fn coord_of(&self, index: usize) -> Coord;
}

pub struct Grid<V, L> {
    layout: Arc<L>,
    cells: Vec<V>,
}

impl<V: AetherValue, L: Layout> Grid<V, L> {
    /// A grid with every stored cell at zero.
    pub fn zeroed(layout: Arc<L>) -> Self {
        let cells = vec![V::zero(); layout.len()];
        Self { layout, cells }
    }

    #[inline]
    pub fn layout(&self) -> &Arc<L> {
        &self.layout
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    pub fn at(&self, index: usize) -> &V {
        &self.cells[index]
    }

    #[inline]
    pub fn get(&self, coord: &Coord) -> Option<&V> {
        self.layout.index_of(coord).map(|index| &self.cells[index])
    }

    #[inline(always)]
    pub fn set(&mut self, index: usize, value: V) {
        self.cells[index] = value;
    }

    #[inline(always)]
    pub fn add_at(&mut self, index: usize, value: &V) {
        self.cells[index].add_assign_ref(value);
    }

    #[inline]
    pub fn cells(&self) -> &[V] {
        &self.cells
    }

    /// Sum of the stored cells, without any symmetry weighting.
    pub fn stored_total(&self) -> V {
        let mut total = V::zero();
        for value in &self.cells {
            total.add_assign_ref(value);
        }
        total
    }

    /// Smallest and largest stored value.
    pub fn min_max(&self) -> Option<(V, V)> {
        let mut iter = self.cells.iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for value in iter {
            if value < min {
                min = value;
            } else if value > max {
                max = value;
            }
        }
        Some((min.clone(), max.clone()))
    }

    /// Inclusive range of layout coordinates on `axis` holding a nonzero
    /// value, or `None` when every stored cell is zero.
    pub fn occupied_range(&self, axis: usize) -> Option<(i64, i64)> {
        let mut range: Option<(i64, i64)> = None;
        for (index, value) in self.cells.iter().enumerate() {
            if value.is_zero() {
                continue;
            }
            let c = self.layout.coord_of(index).get(axis);
            range = Some(match range {
                None => (c, c),
                Some((lo, hi)) => (lo.min(c), hi.max(c)),
            });
        }
        range
    }
}

impl<V: Clone, L> Clone for Grid<V, L> {
    fn clone(&self) -> Self {
        Self {
            layout: Arc::clone(&self.layout),
            cells: self.cells.clone(),
        }
    }
}
