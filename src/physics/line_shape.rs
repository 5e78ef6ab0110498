//! Per-line shape parameters at ambient conditions.
//!
//! HITRAN parameters are tabulated at 296 K and 1 atm. For a line at pressure `p`
//! [atm], partial pressure `p_s = p * vmr` and temperature `T`:
//!
//! - center: `nu + p * delta_air`
//! - collisional HWHM: `(gamma_air * (p - p_s) + gamma_self * p_s) * (296 / T)^n_air`
//! - Doppler HWHM: `(nu / c) * sqrt(2 ln2 R T / m)`
//! - strength: `sw * boltzmann * stimulated_emission * Q(296) / Q(T) * 1e-4`

use std::f64::consts::LN_2;

use crate::catalog::PartitionTable;
use crate::domain::{Conditions, LineRecord};
use crate::error::LblError;
use crate::physics::constants::*;

/// Everything the Voigt evaluator needs for one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineShape {
    /// Pressure-shifted center [cm-1].
    pub center: f64,
    /// Collisional HWHM [cm-1].
    pub gamma: f64,
    /// Doppler HWHM [cm-1].
    pub alpha: f64,
    /// Temperature-scaled integrated strength.
    pub strength: f64,
}

impl LineShape {
    pub fn derive(
        line: &LineRecord,
        conditions: &Conditions,
        tips: &PartitionTable,
    ) -> Result<Self, LblError> {
        let p = conditions.pressure * PA_TO_ATM;
        let partial_pressure = p * conditions.mixing_ratio;
        let t = conditions.temperature;

        let iso = line.isotopologue.index();
        let q_ratio = tips.total_partition_function(REFERENCE_TEMPERATURE, iso)?
            / tips.total_partition_function(t, iso)?;

        Ok(Self {
            center: pressure_shifted_center(line.nu, line.delta_air, p),
            gamma: collisional_halfwidth(line, p, partial_pressure, t),
            alpha: doppler_halfwidth(line.nu, t, line.mass),
            strength: line.sw
                * lower_state_factor(line.e_lower, t)
                * stimulated_emission_factor(line.nu, t)
                * q_ratio
                * CM2_TO_M2,
        })
    }
}

/// `pressure` in atm.
pub fn pressure_shifted_center(nu: f64, delta_air: f64, pressure: f64) -> f64 {
    nu + pressure * delta_air
}

/// Air- plus self-broadened HWHM [cm-1]; pressures in atm.
pub fn collisional_halfwidth(
    line: &LineRecord,
    pressure: f64,
    partial_pressure: f64,
    temperature: f64,
) -> f64 {
    let broadening = line.gamma_air * (pressure - partial_pressure) + line.gamma_self * partial_pressure;
    broadening * (REFERENCE_TEMPERATURE / temperature).powf(line.n_air)
}

/// Doppler HWHM [cm-1] for a line at `nu` cm-1 and molecular mass in g mol-1.
pub fn doppler_halfwidth(nu: f64, temperature: f64, mass: f64) -> f64 {
    (nu / SPEED_OF_LIGHT) * (2.0 * LN_2 * GAS_CONSTANT * temperature / mass).sqrt()
}

/// Boltzmann population ratio of the lower state, `T` relative to 296 K.
pub fn lower_state_factor(e_lower: f64, temperature: f64) -> f64 {
    (e_lower * SECOND_RADIATION_CONSTANT * (temperature - REFERENCE_TEMPERATURE)
        / (temperature * REFERENCE_TEMPERATURE))
        .exp()
}

/// Stimulated-emission correction, `T` relative to 296 K.
pub fn stimulated_emission_factor(nu: f64, temperature: f64) -> f64 {
    let g = (-SECOND_RADIATION_CONSTANT * nu / temperature).exp();
    let g_ref = (-SECOND_RADIATION_CONSTANT * nu / REFERENCE_TEMPERATURE).exp();
    (1.0 - g) / (1.0 - g_ref)
}

/// Ideal-gas number density of the absorber [m-3].
pub fn number_density(temperature: f64, pressure: f64, mixing_ratio: f64) -> f64 {
    pressure * mixing_ratio / (BOLTZMANN * temperature)
}
