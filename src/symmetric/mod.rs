//! Symmetry-folded engine.
//!
//! A single source on an unbounded or centred enclosed grid stays invariant
//! under axis permutations and sign flips, so only the canonical orthant is
//! stored and stepped.

mod engine;
mod layout;
mod multiplicity;

pub use engine::SymmetricAether;
pub use layout::CanonicalLayout;
pub use multiplicity::{images, mirror_multiplicity, orbit_size};
