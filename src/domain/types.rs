//! Shared domain types.
//!
//! Grid, conditions and settings are `Copy` and serializable; they are exported
//! next to computed spectra.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::LblError;

/// HITRAN numbers the tenth isotopologue of a molecule as `0`.
///
/// Both line records and mass rows use that convention; internally the id is
/// remapped to `10` so that ids stay 1-based and contiguous.
pub const HITRAN_ISOTOPOLOGUE_ZERO_ALIAS: u32 = 10;

/// Largest number of points a grid may address.
pub const MAX_GRID_POINTS: u64 = i64::MAX as u64;

/// Uniform wavenumber grid `v0 + i/points_per_unit` for `i in 0..len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectralGrid {
    v0: i32,
    vn: i32,
    points_per_unit: u32,
}

impl SpectralGrid {
    /// Build a grid spanning `[v0, vn]` cm-1 with `points_per_unit` points per cm-1.
    pub fn new(v0: i32, vn: i32, points_per_unit: u32) -> Result<Self, LblError> {
        if vn <= v0 {
            return Err(LblError::invalid(format!(
                "Grid upper bound ({vn}) must be greater than lower bound ({v0})."
            )));
        }
        if points_per_unit == 0 {
            return Err(LblError::invalid("Grid resolution must be at least 1 point per cm-1."));
        }
        let span = (vn as i64 - v0 as i64) as u64;
        let fits = span
            .checked_mul(points_per_unit as u64)
            .is_some_and(|n| n <= MAX_GRID_POINTS);
        if !fits {
            return Err(LblError::invalid(format!(
                "Grid [{v0}, {vn}] at {points_per_unit} points per cm-1 has too many points."
            )));
        }
        Ok(Self {
            v0,
            vn,
            points_per_unit,
        })
    }

    /// Infer grid parameters from an explicit, uniformly spaced wavenumber array.
    ///
    /// The upper bound is rounded up by one wavenumber so that the last requested
    /// point is covered.
    pub fn from_wavenumbers(wavenumbers: &[f64]) -> Result<Self, LblError> {
        let [first, second, ..] = wavenumbers else {
            return Err(LblError::invalid("A wavenumber grid needs at least two points."));
        };
        let last = wavenumbers[wavenumbers.len() - 1];
        let spacing = second - first;
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(LblError::invalid(format!(
                "Wavenumber grid spacing must be positive, got {spacing}."
            )));
        }
        let points_per_unit = (1.0 / spacing).round();
        if points_per_unit < 1.0 {
            return Err(LblError::invalid(format!(
                "Wavenumber grid spacing {spacing} is coarser than one point per cm-1."
            )));
        }
        let bound = |w: f64| {
            let w = w.round();
            if w >= i32::MIN as f64 && w < i32::MAX as f64 {
                Ok(w as i32)
            } else {
                Err(LblError::invalid(format!("Wavenumber {w} is outside the supported grid range.")))
            }
        };
        Self::new(bound(*first)?, bound(last)? + 1, points_per_unit as u32)
    }

    pub fn v0(&self) -> i32 {
        self.v0
    }

    pub fn vn(&self) -> i32 {
        self.vn
    }

    pub fn points_per_unit(&self) -> u32 {
        self.points_per_unit
    }

    /// Grid spacing [cm-1].
    pub fn dv(&self) -> f64 {
        1.0 / self.points_per_unit as f64
    }

    /// Number of grid points, `(vn - v0) * points_per_unit`.
    pub fn len(&self) -> usize {
        let span = (self.vn as i64 - self.v0 as i64).max(0) as usize;
        span.saturating_mul(self.points_per_unit as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wavenumber of grid point `i` [cm-1].
    pub fn wavenumber(&self, i: usize) -> f64 {
        self.v0 as f64 + i as f64 * self.dv()
    }

    pub fn wavenumbers(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.wavenumber(i)).collect()
    }
}

/// Ambient state of the absorbing gas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    /// Total pressure [Pa].
    pub pressure: f64,
    /// Temperature [K].
    pub temperature: f64,
    /// Volume mixing ratio of the absorber [mol mol-1].
    pub mixing_ratio: f64,
}

impl Conditions {
    pub fn validate(&self) -> Result<(), LblError> {
        if !(self.pressure.is_finite() && self.pressure >= 0.0) {
            return Err(LblError::invalid(format!(
                "Pressure must be finite and >= 0 Pa, got {}.",
                self.pressure
            )));
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(LblError::invalid(format!(
                "Temperature must be finite and > 0 K, got {}.",
                self.temperature
            )));
        }
        if !(self.mixing_ratio.is_finite() && (0.0..=1.0).contains(&self.mixing_ratio)) {
            return Err(LblError::invalid(format!(
                "Mixing ratio must lie in [0, 1], got {}.",
                self.mixing_ratio
            )));
        }
        Ok(())
    }
}

/// How far each line reaches and whether its local baseline is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulationSettings {
    /// Cut-off distance from line center [cm-1].
    pub cut_off: u32,
    /// Subtract the lesser window-edge value of each line from its window.
    pub remove_pedestal: bool,
}

impl Default for AccumulationSettings {
    fn default() -> Self {
        Self {
            cut_off: 25,
            remove_pedestal: false,
        }
    }
}

/// 1-based isotopologue number with the HITRAN `0 -> 10` alias already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsotopologueId(u32);

impl IsotopologueId {
    /// Interpret a raw HITRAN local isotopologue id.
    pub fn from_hitran(local_iso_id: u32) -> Self {
        if local_iso_id == 0 {
            Self(HITRAN_ISOTOPOLOGUE_ZERO_ALIAS)
        } else {
            Self(local_iso_id)
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based position of this isotopologue in per-isotopologue tables.
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

/// One spectral line, ready to be accumulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRecord {
    /// Transition wavenumber [cm-1].
    pub nu: f64,
    /// Line strength at 296 K [cm-1 / (molecule cm-2)].
    pub sw: f64,
    /// Air-broadened half-width at 296 K [cm-1 atm-1].
    pub gamma_air: f64,
    /// Self-broadened half-width at 296 K [cm-1 atm-1].
    pub gamma_self: f64,
    /// Temperature exponent of the air-broadened half-width.
    pub n_air: f64,
    /// Lower-state energy [cm-1].
    pub e_lower: f64,
    /// Air pressure shift [cm-1 atm-1].
    pub delta_air: f64,
    pub isotopologue: IsotopologueId,
    /// Molecular mass of the isotopologue [g mol-1].
    pub mass: f64,
}

/// Absorption coefficients accumulated on a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsorptionSpectrum {
    grid: SpectralGrid,
    values: Vec<f64>,
}

impl AbsorptionSpectrum {
    pub fn zeros(grid: SpectralGrid) -> Self {
        Self {
            grid,
            values: vec![0.0; grid.len()],
        }
    }

    pub fn grid(&self) -> &SpectralGrid {
        &self.grid
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Multiply every value by `factor` (e.g. a number density).
    pub fn scale(&mut self, factor: f64) {
        self.values.iter_mut().for_each(|v| *v *= factor);
    }

    /// Elementwise sum of another spectrum on the same grid.
    pub fn add_assign(&mut self, other: &AbsorptionSpectrum) -> Result<(), LblError> {
        if self.grid != other.grid {
            return Err(LblError::invalid("Cannot add spectra defined on different grids."));
        }
        for (a, b) in self.values.iter_mut().zip(&other.values) {
            *a += b;
        }
        Ok(())
    }

    /// Largest value and the wavenumber where it occurs.
    pub fn peak(&self) -> Option<(f64, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.values.iter().enumerate() {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, v)| (self.grid.wavenumber(i), v))
    }

    /// Rectangle-rule integral over wavenumber.
    pub fn integrated(&self) -> f64 {
        self.values.iter().sum::<f64>() * self.grid.dv()
    }
}

/// One atmospheric layer of a multi-layer computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereLayer {
    /// Pressure [Pa].
    pub pressure: f64,
    /// Temperature [K].
    pub temperature: f64,
    /// Absorber formula -> volume mixing ratio [mol mol-1].
    pub mixing_ratios: BTreeMap<String, f64>,
}

/// A full `lbl absorption` run as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and environment).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub catalog_path: PathBuf,
    pub molecule: String,
    pub conditions: Conditions,
    pub grid: SpectralGrid,
    pub settings: AccumulationSettings,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// A `lbl layers` run.
#[derive(Debug, Clone)]
pub struct LayersConfig {
    pub catalog_path: PathBuf,
    pub atmosphere_path: PathBuf,
    pub grid: SpectralGrid,
    pub settings: AccumulationSettings,
    pub export_csv: Option<PathBuf>,
}
