use crate::boundary::Boundary;
use crate::coord::{Coord, Direction, MAX_DIMENSION};
use crate::grid::Layout;

/// A full hypercube of `side` cells per axis, row-major (last axis fastest).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseLayout {
    dimension: usize,
    side: usize,
    strides: [usize; MAX_DIMENSION],
    len: usize,
}

/// Where a von Neumann neighbor lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Neighbor {
    Stored(usize),
    /// Outside storage on an unbounded grid: an implicit zero.
    Beyond,
    /// Past the wall of an enclosed grid.
    Missing,
}

impl DenseLayout {
    pub fn new(dimension: usize, side: usize) -> Self {
        debug_assert!((1..=MAX_DIMENSION).contains(&dimension));
        let mut strides = [0; MAX_DIMENSION];
        let mut stride = 1;
        for axis in (0..dimension).rev() {
            strides[axis] = stride;
            stride *= side;
        }
        Self {
            dimension,
            side,
            strides,
            len: stride,
        }
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// The layout enlarged by `margin` cells on both ends of every axis.
    /// Old coordinates map to new ones by adding `margin`.
    pub fn grown(&self, margin: usize) -> Self {
        Self::new(self.dimension, self.side + 2 * margin)
    }

    /// Chebyshev distance from `coord` to the nearest face, `0` on the edge.
    #[inline]
    pub fn distance_to_edge(&self, coord: &Coord) -> i64 {
        let last = self.side as i64 - 1;
        coord
            .as_slice()
            .iter()
            .map(|&c| c.min(last - c))
            .min()
            .unwrap_or(0)
    }

    #[inline]
    pub(crate) fn neighbor(&self, boundary: Boundary, coord: &Coord, direction: Direction) -> Neighbor {
        let mut next = coord.step(direction);
        let axis = direction.axis();
        let c = next.get(axis);
        let side = self.side as i64;
        if (0..side).contains(&c) {
            return Neighbor::Stored(self.index_unchecked(&next));
        }
        match boundary {
            Boundary::Unbounded => Neighbor::Beyond,
            Boundary::Enclosed { .. } => Neighbor::Missing,
            Boundary::Toroidal { .. } => {
                next.set(axis, c.rem_euclid(side));
                Neighbor::Stored(self.index_unchecked(&next))
            }
        }
    }

    #[inline(always)]
    fn index_unchecked(&self, coord: &Coord) -> usize {
        coord
            .as_slice()
            .iter()
            .zip(&self.strides)
            .map(|(&c, &stride)| c as usize * stride)
            .sum()
    }
}

impl Layout for DenseLayout {
    #[inline]
    fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn index_of(&self, coord: &Coord) -> Option<usize> {
        let side = self.side as i64;
        if coord.dimension() != self.dimension
            || coord.as_slice().iter().any(|c| !(0..side).contains(c))
        {
            return None;
        }
        Some(self.index_unchecked(coord))
    }

    fn coord_of(&self, index: usize) -> Coord {
        debug_assert!(index < self.len);
        let mut coord = Coord::origin(self.dimension);
        let mut rest = index;
        for axis in (0..self.dimension).rev() {
            coord.set(axis, (rest % self.side) as i64);
            rest /= self.side;
        }
        coord
    }
}

#[cfg(test)]
mod tests {
    use super::{DenseLayout, Neighbor};
    use crate::boundary::Boundary;
    use crate::coord::{Coord, Direction};
    use crate::grid::Layout;

    #[test]
    fn index_round_trips_in_row_major_order() {
        let layout = DenseLayout::new(3, 4);
        assert_eq!(layout.len(), 64);
        assert_eq!(layout.index_of(&Coord::from([0, 0, 1])), Some(1));
        assert_eq!(layout.index_of(&Coord::from([1, 0, 0])), Some(16));
        for index in 0..layout.len() {
            assert_eq!(layout.index_of(&layout.coord_of(index)), Some(index));
        }
        assert_eq!(layout.index_of(&Coord::from([4, 0, 0])), None);
        assert_eq!(layout.index_of(&Coord::from([0, -1, 0])), None);
        assert_eq!(layout.index_of(&Coord::from([0, 0])), None);
    }

    #[test]
    fn neighbors_follow_boundary() {
        let layout = DenseLayout::new(2, 3);
        let corner = Coord::from([0, 2]);
        let west = Direction::new(0, false);
        let north = Direction::new(1, true);
        assert_eq!(layout.neighbor(Boundary::Unbounded, &corner, west), Neighbor::Beyond);
        assert_eq!(
            layout.neighbor(Boundary::Enclosed { side: 3 }, &corner, west),
            Neighbor::Missing
        );
        assert_eq!(
            layout.neighbor(Boundary::Toroidal { side: 3 }, &corner, west),
            Neighbor::Stored(layout.index_of(&Coord::from([2, 2])).unwrap())
        );
        assert_eq!(
            layout.neighbor(Boundary::Toroidal { side: 3 }, &corner, north),
            Neighbor::Stored(layout.index_of(&Coord::from([0, 0])).unwrap())
        );
    }

    #[test]
    fn growth_and_edge_distance() {
        let layout = DenseLayout::new(2, 5);
        let grown = layout.grown(1);
        assert_eq!(grown.side(), 7);
        assert_eq!(grown.len(), 49);
        assert_eq!(layout.distance_to_edge(&Coord::from([2, 2])), 2);
        assert_eq!(layout.distance_to_edge(&Coord::from([2, 4])), 0);
        assert_eq!(grown.distance_to_edge(&Coord::from([2, 4]).shifted(1)), 1);
    }
}
