//! Multi-layer, multi-gas absorption.
//!
//! Every gas named in any layer is prepared once from the catalog. Layers are
//! then independent and are evaluated in parallel, each into its own buffers.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use crate::catalog::LineCatalog;
use crate::domain::{AbsorptionSpectrum, AccumulationSettings, AtmosphereLayer, Conditions, SpectralGrid};
use crate::error::LblError;
use crate::physics::number_density;
use crate::spectra::PreparedMolecule;

/// Volume absorption coefficients [m-1] of one layer.
#[derive(Debug, Clone)]
pub struct LayerAbsorption {
    pub per_gas: BTreeMap<String, AbsorptionSpectrum>,
    pub total: AbsorptionSpectrum,
}

/// Absorption of each layer; gases absent from the catalog are skipped with a warning.
pub fn compute_layers<C: LineCatalog + ?Sized>(
    catalog: &C,
    layers: &[AtmosphereLayer],
    grid: &SpectralGrid,
    settings: &AccumulationSettings,
) -> Result<Vec<LayerAbsorption>, LblError> {
    let formulas: BTreeSet<&str> = layers
        .iter()
        .flat_map(|layer| layer.mixing_ratios.keys().map(String::as_str))
        .collect();

    let mut molecules = BTreeMap::new();
    for formula in formulas {
        match PreparedMolecule::load(catalog, formula) {
            Ok(molecule) => {
                molecules.insert(formula.to_string(), molecule);
            }
            Err(LblError::MoleculeNotFound { .. }) => {
                log::warn!("{formula} is not in the catalog; skipping it.");
            }
            Err(err) => return Err(err),
        }
    }

    layers
        .par_iter()
        .enumerate()
        .map(|(index, layer)| {
            let result = layer_absorption(layer, &molecules, grid, settings)?;
            log::info!(
                "Layer {index} (p = {} Pa, T = {} K): {} gases",
                layer.pressure,
                layer.temperature,
                result.per_gas.len()
            );
            Ok(result)
        })
        .collect()
}

fn layer_absorption(
    layer: &AtmosphereLayer,
    molecules: &BTreeMap<String, PreparedMolecule>,
    grid: &SpectralGrid,
    settings: &AccumulationSettings,
) -> Result<LayerAbsorption, LblError> {
    let mut per_gas = BTreeMap::new();
    let mut total = AbsorptionSpectrum::zeros(*grid);
    for (formula, &mixing_ratio) in &layer.mixing_ratios {
        let Some(molecule) = molecules.get(formula) else {
            continue;
        };
        let conditions = Conditions {
            pressure: layer.pressure,
            temperature: layer.temperature,
            mixing_ratio,
        };
        let mut spectrum = molecule.absorption(&conditions, grid, settings)?;
        spectrum.scale(number_density(layer.temperature, layer.pressure, mixing_ratio));
        total.add_assign(&spectrum)?;
        per_gas.insert(formula.clone(), spectrum);
    }
    Ok(LayerAbsorption { per_gas, total })
}
