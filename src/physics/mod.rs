//! Line physics: constants and the per-line derivation of shape parameters.

pub mod constants;
pub mod line_shape;

pub use constants::*;
pub use line_shape::*;
