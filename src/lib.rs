//! `lbl-spectra` library crate.
//!
//! Line-by-line molecular absorption: HITRAN-style line parameters are turned
//! into per-line Voigt profiles and accumulated onto a wavenumber grid. The
//! binary (`lbl`) is a thin wrapper around this library.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod physics;
pub mod report;
pub mod spectra;
