use std::fmt;

use crate::error::{AetherError, Result};

/// What lies beyond the stored region of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Conceptually infinite grid of zeros. Storage grows by one cell on
    /// every side whenever activity reaches the edge. Coordinates are
    /// relative to the origin (the seed position).
    Unbounded,
    /// Box of `side` cells per axis whose opposite faces are adjacent.
    /// Coordinates run over `[0, side)`.
    Toroidal { side: usize },
    /// Box of `side` cells per axis. Edge cells have fewer neighbors and
    /// nothing flows out. Coordinates run over `[0, side)`.
    Enclosed { side: usize },
}

impl Boundary {
    /// Side of the fixed box, `None` when unbounded.
    #[inline]
    pub fn side(&self) -> Option<usize> {
        match *self {
            Boundary::Unbounded => None,
            Boundary::Toroidal { side } | Boundary::Enclosed { side } => Some(side),
        }
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Boundary::Unbounded)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self.side() {
            Some(0) => Err(AetherError::NonPositiveSide),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Unbounded => write!(f, "unbounded grids"),
            Boundary::Toroidal { side } => write!(f, "toroidal grids (side {side})"),
            Boundary::Enclosed { side } => write!(f, "enclosed grids (side {side})"),
        }
    }
}
