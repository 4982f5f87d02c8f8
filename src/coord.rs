//! Coordinates and von Neumann directions for grids of up to five axes.
//!
//! `Coord` is a fixed-capacity tuple so the hot loops never allocate. Only
//! the first `dimension()` axes are meaningful; the tail is kept at zero so
//! derived equality and hashing stay consistent.

use crate::error::{AetherError, Result};

pub const MAX_DIMENSION: usize = 5;

/// Rejects dimensions outside `1..=MAX_DIMENSION`.
pub fn check_dimension(dimension: usize) -> Result<()> {
    if (1..=MAX_DIMENSION).contains(&dimension) {
        Ok(())
    } else {
        Err(AetherError::InvalidDimension(dimension))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    axes: [i64; MAX_DIMENSION],
    dim: u8,
}

impl Coord {
    /// The origin of a grid with `dimension` axes.
    #[inline]
    pub fn origin(dimension: usize) -> Self {
        debug_assert!((1..=MAX_DIMENSION).contains(&dimension));
        Self {
            axes: [0; MAX_DIMENSION],
            dim: dimension as u8,
        }
    }

    /// A coordinate with every axis set to `value`.
    #[inline]
    pub fn splat(dimension: usize, value: i64) -> Self {
        let mut coord = Self::origin(dimension);
        coord.axes[..dimension].fill(value);
        coord
    }

    pub fn from_slice(axes: &[i64]) -> Result<Self> {
        check_dimension(axes.len())?;
        let mut coord = Self::origin(axes.len());
        coord.axes[..axes.len()].copy_from_slice(axes);
        Ok(coord)
    }

    #[inline(always)]
    pub fn dimension(&self) -> usize {
        self.dim as usize
    }

    #[inline(always)]
    pub fn get(&self, axis: usize) -> i64 {
        self.axes[axis]
    }

    #[inline(always)]
    pub fn set(&mut self, axis: usize, value: i64) {
        self.axes[axis] = value;
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[i64] {
        &self.axes[..self.dim as usize]
    }

    /// The neighbor one cell away in `direction`.
    #[inline(always)]
    pub fn step(&self, direction: Direction) -> Self {
        let mut next = *self;
        next.axes[direction.axis()] += direction.delta();
        next
    }

    /// Adds `delta` to every axis.
    #[inline]
    pub fn shifted(&self, delta: i64) -> Self {
        let mut next = *self;
        for value in &mut next.axes[..self.dim as usize] {
            *value += delta;
        }
        next
    }

    /// Adds `other` axis by axis.
    #[inline]
    pub fn shifted_by(&self, other: &Coord) -> Self {
        debug_assert_eq!(self.dim, other.dim);
        let mut next = *self;
        for (value, delta) in next.axes[..self.dim as usize]
            .iter_mut()
            .zip(other.as_slice())
        {
            *value += delta;
        }
        next
    }

    /// Subtracts `other` axis by axis.
    #[inline]
    pub fn relative_to(&self, other: &Coord) -> Self {
        debug_assert_eq!(self.dim, other.dim);
        let mut next = *self;
        for (value, base) in next.axes[..self.dim as usize]
            .iter_mut()
            .zip(other.as_slice())
        {
            *value -= base;
        }
        next
    }

    /// Folds the coordinate into the canonical orthant: absolute value on
    /// every axis, then axes sorted in descending order.
    #[inline]
    pub fn canonical(&self) -> Self {
        let mut next = *self;
        let axes = &mut next.axes[..self.dim as usize];
        for value in axes.iter_mut() {
            *value = value.abs();
        }
        axes.sort_unstable_by(|a, b| b.cmp(a));
        next
    }

    /// True when `0 <= c_n <= ... <= c_1`.
    #[inline]
    pub fn is_canonical(&self) -> bool {
        let axes = self.as_slice();
        axes[axes.len() - 1] >= 0 && axes.windows(2).all(|pair| pair[0] >= pair[1])
    }

    /// Largest absolute axis value (Chebyshev norm).
    #[inline]
    pub fn max_abs(&self) -> i64 {
        self.as_slice().iter().map(|v| v.abs()).max().unwrap_or(0)
    }

    #[inline]
    pub fn coordinate_sum(&self) -> i64 {
        self.as_slice().iter().sum()
    }

    #[inline]
    pub fn is_even(&self) -> bool {
        self.coordinate_sum().rem_euclid(2) == 0
    }
}

impl std::fmt::Debug for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_slice())
    }
}

macro_rules! coord_from_array {
    ($($n:literal),*) => {
        $(
            impl From<[i64; $n]> for Coord {
                fn from(axes: [i64; $n]) -> Self {
                    let mut coord = Coord::origin($n);
                    coord.axes[..$n].copy_from_slice(&axes);
                    coord
                }
            }
        )*
    };
}

coord_from_array!(1, 2, 3, 4, 5);

/// One of the `2 * dimension` von Neumann directions.
///
/// Enumeration order is axis 0 positive, axis 0 negative, axis 1 positive,
/// and so on; `index()` follows that order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Direction(u8);

impl Direction {
    #[inline]
    pub const fn new(axis: usize, positive: bool) -> Self {
        Self((axis as u8) << 1 | if positive { 0 } else { 1 })
    }

    #[inline(always)]
    pub const fn axis(self) -> usize {
        (self.0 >> 1) as usize
    }

    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        self.0 & 1 == 0
    }

    #[inline(always)]
    pub const fn delta(self) -> i64 {
        if self.is_positive() { 1 } else { -1 }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn reverse(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// All directions of a grid with `dimension` axes, in enumeration order.
    pub fn all(dimension: usize) -> impl Iterator<Item = Direction> {
        (0..(dimension * 2) as u8).map(Direction)
    }
}
