//! Dense reference engine: every cell of the bounding box is stored and
//! visited.

mod engine;
mod layout;

pub use engine::SimpleAether;
pub use layout::DenseLayout;
