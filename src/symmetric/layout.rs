use crate::coord::{Coord, MAX_DIMENSION};
use crate::grid::Layout;

/// Storage for the canonical orthant `reach >= c_1 >= c_2 >= ... >= c_n >= 0`.
///
/// A descending tuple is ranked as `sum_i C(c_i + n - 1 - i, n - i)`
/// (zero-based `i`), which enumerates the orthant densely and keeps every
/// rank when `reach` grows, so a grown layout extends the old one. Only the
/// binomial table is kept; coordinates are unranked on demand.
#[derive(Clone, Debug)]
pub struct CanonicalLayout {
    dimension: usize,
    reach: usize,
    /// `binomials[m][k] = C(m, k)` for `m <= reach + dimension`.
    binomials: Vec<[usize; MAX_DIMENSION + 1]>,
    len: usize,
}

impl CanonicalLayout {
    pub fn new(dimension: usize, reach: usize) -> Self {
        debug_assert!((1..=MAX_DIMENSION).contains(&dimension));
        let mut binomials = vec![[0usize; MAX_DIMENSION + 1]; reach + dimension + 1];
        for m in 0..binomials.len() {
            binomials[m][0] = 1;
            for k in 1..=MAX_DIMENSION.min(m) {
                binomials[m][k] = binomials[m - 1][k - 1] + binomials[m - 1][k];
            }
        }
        let len = binomials[reach + dimension][dimension];
        Self {
            dimension,
            reach,
            binomials,
            len,
        }
    }

    /// Largest coordinate value stored on any axis.
    #[inline]
    pub fn reach(&self) -> usize {
        self.reach
    }

    /// The layout one cell further out on every axis.
    pub fn grown(&self) -> Self {
        Self::new(self.dimension, self.reach + 1)
    }

    #[inline]
    fn rank(&self, coord: &Coord) -> usize {
        let n = self.dimension;
        coord
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, &c)| self.binomials[c as usize + n - 1 - i][n - i])
            .sum()
    }

    /// Inverse of `rank`: each term `C(c_i + n - 1 - i, n - i)` is the
    /// largest binomial of its column not exceeding what is left.
    fn unrank(&self, mut rank: usize) -> Coord {
        let n = self.dimension;
        let mut coord = Coord::origin(n);
        for i in 0..n {
            let k = n - i;
            let upper = self.reach + n - 1 - i;
            // C(a, k) is non-decreasing in `a` and C(0, k) == 0.
            let a = self.binomials[..=upper].partition_point(|row| row[k] <= rank) - 1;
            rank -= self.binomials[a][k];
            coord.set(i, (a + 1 + i - n) as i64);
        }
        coord
    }
}

impl Layout for CanonicalLayout {
    #[inline]
    fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    /// Only canonical coordinates are stored; fold with
    /// [`Coord::canonical`] first.
    #[inline]
    fn index_of(&self, coord: &Coord) -> Option<usize> {
        if coord.dimension() != self.dimension
            || !coord.is_canonical()
            || coord.get(0) > self.reach as i64
        {
            return None;
        }
        Some(self.rank(coord))
    }

    #[inline]
    fn coord_of(&self, index: usize) -> Coord {
        debug_assert!(index < self.len);
        self.unrank(index)
    }
}
