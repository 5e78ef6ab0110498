//! Domain types used throughout the computation.
//!
//! This module defines:
//!
//! - the spectral grid and the output spectrum (`SpectralGrid`, `AbsorptionSpectrum`)
//! - ambient inputs (`Conditions`, `AccumulationSettings`, `AtmosphereLayer`)
//! - per-line inputs (`LineRecord`, `IsotopologueId`)
//! - the run configuration assembled by the CLI (`RunConfig`)

pub mod types;

pub use types::*;
