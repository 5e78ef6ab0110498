//! Spectral accumulation: per-line accumulator, catalog-driven driver and the
//! cached/multi-layer entry points built on top of them.

pub mod accumulator;
pub mod driver;
pub mod layers;
pub mod prepared;

pub use accumulator::*;
pub use driver::*;
pub use layers::*;
pub use prepared::*;
