//! Shared compute pipelines behind the `absorption` and `layers` commands.
//!
//! catalog file -> driver -> spectrum (+ line statistics)

use crate::catalog::LineCatalog;
use crate::domain::{AbsorptionSpectrum, AtmosphereLayer, LayersConfig, RunConfig};
use crate::error::LblError;
use crate::io::{read_catalog_file, read_layers_json};
use crate::spectra::{LayerAbsorption, LineStats, compute_absorption_detailed, compute_layers};

/// All computed outputs of a single `lbl absorption` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub spectrum: AbsorptionSpectrum,
    pub stats: LineStats,
}

/// Outputs of a `lbl layers` run, in profile order.
#[derive(Debug, Clone)]
pub struct LayersOutput {
    pub layers: Vec<AtmosphereLayer>,
    pub results: Vec<LayerAbsorption>,
}

pub fn run_absorption(config: &RunConfig) -> Result<RunOutput, LblError> {
    let catalog = read_catalog_file(&config.catalog_path)?;
    run_absorption_with_catalog(config, &catalog)
}

/// Run against an already opened catalog.
pub fn run_absorption_with_catalog<C: LineCatalog + ?Sized>(
    config: &RunConfig,
    catalog: &C,
) -> Result<RunOutput, LblError> {
    let (spectrum, stats) = compute_absorption_detailed(
        catalog,
        &config.conditions,
        &config.grid,
        &config.settings,
        &config.molecule,
    )?;
    Ok(RunOutput { spectrum, stats })
}

pub fn run_layers(config: &LayersConfig) -> Result<LayersOutput, LblError> {
    let layers = read_layers_json(&config.atmosphere_path)?;
    let catalog = read_catalog_file(&config.catalog_path)?;
    let results = compute_layers(&catalog, &layers, &config.grid, &config.settings)?;
    Ok(LayersOutput { layers, results })
}
