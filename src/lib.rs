//! Aether cellular automaton over 1D-5D grids.
//!
//! Each step, every cell shares part of its value with its strictly smaller
//! von Neumann neighbors (see [`rule`]). Two engines implement it:
//! [`SimpleAether`] stores the whole bounding box and handles any seed and
//! boundary; [`SymmetricAether`] stores only the canonical orthant of a
//! single-source grid. Both implement [`Automaton`], as do the
//! [`tracker`] decorators.

pub mod automaton;
pub mod boundary;
pub mod config;
pub mod coord;
pub mod error;
pub mod grid;
pub mod limits;
pub mod number;
mod parallel;
pub mod rule;
pub mod seed;
pub mod simple;
pub mod symmetric;
pub mod tracker;

pub use automaton::{Automaton, Extent, ToppleObserver};
pub use boundary::Boundary;
pub use config::AetherConfig;
pub use coord::{Coord, Direction, MAX_DIMENSION};
pub use error::{AetherError, Result};
pub use number::AetherValue;
pub use seed::Seed;
pub use simple::SimpleAether;
pub use symmetric::SymmetricAether;
pub use tracker::{ToppleAlternation, Topplings};
