//! Numerical kernels.

pub mod voigt;
