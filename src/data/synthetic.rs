//! Deterministic synthetic line catalogs.
//!
//! Centers are uniform over the requested band, strengths log-normal, widths and
//! temperature exponents uniform over typical HITRAN ranges. TIPS follow the
//! rigid-rotor-like `Q(T) = Q(296) * (T / 296)^1.5` on integer temperatures.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::catalog::{IsotopologueRow, MemoryCatalog, MoleculeId, MoleculeRecord, TipsRow, Transition};
use crate::error::LblError;
use crate::physics::REFERENCE_TEMPERATURE;

/// (mass [g mol-1], Q(296)) of the two isotopologues generated.
const ISOTOPOLOGUES: [(f64, f64); 2] = [(43.98983, 286.09), (44.99318, 576.64)];

/// Fraction of lines assigned to the main isotopologue.
const MAIN_ISOTOPOLOGUE_SHARE: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthConfig {
    pub formula: String,
    pub molecule_id: i64,
    pub seed: u64,
    pub line_count: usize,
    /// Band of line centers `[v0, vn)` [cm-1].
    pub v0: i32,
    pub vn: i32,
    /// TIPS temperature span [K].
    pub t_min: u32,
    pub t_max: u32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            formula: "CO2".to_string(),
            molecule_id: 2,
            seed: 7,
            line_count: 200,
            v0: 600,
            vn: 700,
            t_min: 100,
            t_max: 400,
        }
    }
}

/// One-molecule catalog built from `config`.
pub fn generate_catalog(config: &SynthConfig) -> Result<MemoryCatalog, LblError> {
    let mut catalog = MemoryCatalog::new();
    catalog.insert(generate_molecule(config)?)?;
    Ok(catalog)
}

pub fn generate_molecule(config: &SynthConfig) -> Result<MoleculeRecord, LblError> {
    if config.vn <= config.v0 {
        return Err(LblError::invalid(format!(
            "Synthetic band upper bound ({}) must exceed lower bound ({}).",
            config.vn, config.v0
        )));
    }
    let reference = REFERENCE_TEMPERATURE as u32;
    if !(config.t_min >= 1 && config.t_min <= reference && config.t_max >= reference) {
        return Err(LblError::invalid(format!(
            "Synthetic TIPS span [{}, {}] K must include {reference} K and start above 0 K.",
            config.t_min, config.t_max
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let log_strength = Normal::new(-21.0, 0.8)
        .map_err(|e| LblError::invalid(format!("Strength distribution error: {e}")))?;
    let shift = Normal::new(0.0, 0.002)
        .map_err(|e| LblError::invalid(format!("Shift distribution error: {e}")))?;

    let (v0, vn) = (config.v0 as f64, config.vn as f64);
    let transitions = (0..config.line_count)
        .map(|_| Transition {
            nu: rng.gen_range(v0..vn),
            sw: 10f64.powf(log_strength.sample(&mut rng)),
            gamma_air: rng.gen_range(0.05..0.1),
            gamma_self: rng.gen_range(0.1..0.4),
            n_air: rng.gen_range(0.5..0.8),
            elower: rng.gen_range(0.0..2000.0),
            delta_air: shift.sample(&mut rng),
            local_iso_id: if rng.gen_bool(MAIN_ISOTOPOLOGUE_SHARE) { 1 } else { 2 },
        })
        .collect();

    let mut isotopologues = Vec::with_capacity(ISOTOPOLOGUES.len());
    let mut tips = Vec::new();
    for (i, (mass, q_ref)) in ISOTOPOLOGUES.iter().enumerate() {
        let isoid = i as u32 + 1;
        isotopologues.push(IsotopologueRow { isoid, mass: *mass });
        tips.extend((config.t_min..=config.t_max).map(|t| TipsRow {
            isotopologue_id: isoid,
            temperature: t as f64,
            data: q_ref * (t as f64 / REFERENCE_TEMPERATURE).powf(1.5),
        }));
    }

    log::debug!(
        "Generated {} synthetic lines for {} (seed {})",
        config.line_count,
        config.formula,
        config.seed
    );
    Ok(MoleculeRecord {
        id: MoleculeId(config.molecule_id),
        formula: config.formula.clone(),
        aliases: Vec::new(),
        isotopologues,
        tips,
        transitions,
    })
}
