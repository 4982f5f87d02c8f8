//! Error types for automaton construction.

use thiserror::Error;

use crate::coord::MAX_DIMENSION;

/// Errors raised while building an automaton.
///
/// Stepping never fails: every precondition is checked up front.
#[derive(Debug, Error)]
pub enum AetherError {
    /// Grid dimension outside `1..=MAX_DIMENSION`.
    #[error("grid dimension must be between 1 and {MAX_DIMENSION}, got {0}")]
    InvalidDimension(usize),

    /// Grid side of zero.
    #[error("grid side must be greater than zero")]
    NonPositiveSide,

    /// Even side where a unique centre cell is required.
    #[error("only odd grid sides are supported here, got {0}")]
    EvenSide(usize),

    /// Source cell outside the grid box.
    #[error("source coordinates {coords:?} are outside a grid of side {side}")]
    SourceOutOfBounds {
        /// Offending coordinates.
        coords: Vec<i64>,
        /// Side of the box.
        side: usize,
    },

    /// Single source away from the symmetry centre.
    #[error("symmetric grids need the source at their centre, got {coords:?}")]
    OffCentreSource {
        /// Offending coordinates.
        coords: Vec<i64>,
    },

    /// Random block larger than the fixed grid box.
    #[error("a random block of side {block} does not fit a grid of side {side}")]
    BlockDoesNotFit {
        /// Side of the block.
        block: usize,
        /// Side of the box.
        side: usize,
    },

    /// Coordinates with the wrong number of axes.
    #[error("expected coordinates with {expected} axes, got {got}")]
    DimensionMismatch {
        /// Grid dimension.
        expected: usize,
        /// Number of axes supplied.
        got: usize,
    },

    /// Fixed-width seed too negative to rule out overflow.
    #[error(
        "initial value cannot be smaller than {min} for dimension {dimension}; use a greater initial value or a wider value type"
    )]
    InitialValueTooSmall {
        /// Smallest accepted seed.
        min: String,
        /// Grid dimension.
        dimension: usize,
    },

    /// Random block range with `min > max`.
    #[error("min value {min} cannot be greater than max value {max}")]
    EmptyRange {
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },

    /// Random block range too wide for the value type.
    #[error("the range between the actual min and max values ([{min}, {max}]) is too big")]
    RangeTooLarge {
        /// Lower bound after clamping to include zero.
        min: i64,
        /// Upper bound after clamping to include zero.
        max: i64,
    },

    /// Random values that do not fit the value type.
    #[error("value {0} does not fit the cell value type")]
    ValueOutOfRange(i64),

    /// Engine and boundary policy combination that is not supported.
    #[error("{engine} does not support {boundary}")]
    UnsupportedBoundary {
        /// Engine name.
        engine: &'static str,
        /// Boundary description.
        boundary: String,
    },

    /// Engine and seed combination that is not supported.
    #[error("{engine} only supports single source seeds")]
    UnsupportedSeed {
        /// Engine name.
        engine: &'static str,
    },

    /// Worker pool construction failed.
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, AetherError>;
