//! Spectrum exports.
//!
//! CSV for spreadsheets and plotting scripts, JSON when the run metadata should
//! travel with the values.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AbsorptionSpectrum, AccumulationSettings, Conditions, SpectralGrid};
use crate::error::LblError;
use crate::spectra::LayerAbsorption;

/// Portable record of one computed spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub molecule: String,
    pub conditions: Conditions,
    pub grid: SpectralGrid,
    pub settings: AccumulationSettings,
    pub values: Vec<f64>,
}

impl SpectrumFile {
    pub fn new(
        molecule: &str,
        conditions: &Conditions,
        settings: &AccumulationSettings,
        spectrum: &AbsorptionSpectrum,
    ) -> Self {
        Self {
            tool: "lbl".to_string(),
            generated_at: Utc::now(),
            molecule: molecule.to_string(),
            conditions: *conditions,
            grid: *spectrum.grid(),
            settings: *settings,
            values: spectrum.values().to_vec(),
        }
    }

    /// Rebuild the spectrum; fails on an invalid grid or a value count that does not match it.
    pub fn spectrum(&self) -> Result<AbsorptionSpectrum, LblError> {
        let grid = SpectralGrid::new(self.grid.v0(), self.grid.vn(), self.grid.points_per_unit())?;
        let mut spectrum = AbsorptionSpectrum::zeros(grid);
        if spectrum.values().len() != self.values.len() {
            return Err(LblError::invalid(format!(
                "Spectrum file has {} values for a grid of {} points.",
                self.values.len(),
                spectrum.values().len()
            )));
        }
        spectrum.values_mut().copy_from_slice(&self.values);
        Ok(spectrum)
    }
}

/// `wavenumber,absorption` rows.
pub fn write_spectrum_csv(path: &Path, spectrum: &AbsorptionSpectrum) -> Result<(), LblError> {
    let export_err = |source| LblError::Export {
        path: path.to_path_buf(),
        source,
    };
    let mut file = BufWriter::new(File::create(path).map_err(export_err)?);
    writeln!(file, "wavenumber,absorption").map_err(export_err)?;
    let grid = spectrum.grid();
    for (i, k) in spectrum.values().iter().enumerate() {
        writeln!(file, "{:.6},{:e}", grid.wavenumber(i), k).map_err(export_err)?;
    }
    file.flush().map_err(export_err)
}

pub fn write_spectrum_json(path: &Path, contents: &SpectrumFile) -> Result<(), LblError> {
    let export_err = |source| LblError::Export {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(export_err)?;
    serde_json::to_writer_pretty(file, contents).map_err(|e| export_err(e.into()))
}

pub fn read_spectrum_json(path: &Path) -> Result<SpectrumFile, LblError> {
    let file = File::open(path)
        .map_err(|e| LblError::invalid(format!("Failed to open spectrum JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| LblError::invalid(format!("Invalid spectrum JSON: {e}")))
}

/// One row per layer and wavenumber: `layer,wavenumber,total,<gas>...`.
///
/// Gases missing from a layer are written as `0`.
pub fn write_layers_csv(path: &Path, layers: &[LayerAbsorption]) -> Result<(), LblError> {
    let export_err = |source| LblError::Export {
        path: path.to_path_buf(),
        source,
    };
    let gases: BTreeSet<&str> = layers
        .iter()
        .flat_map(|l| l.per_gas.keys().map(String::as_str))
        .collect();

    let mut file = BufWriter::new(File::create(path).map_err(export_err)?);
    let mut header = String::from("layer,wavenumber,total");
    for gas in &gases {
        header.push(',');
        header.push_str(gas);
    }
    writeln!(file, "{header}").map_err(export_err)?;

    for (index, layer) in layers.iter().enumerate() {
        let grid = layer.total.grid();
        for (i, total) in layer.total.values().iter().enumerate() {
            let mut row = format!("{index},{:.6},{total:e}", grid.wavenumber(i));
            for gas in &gases {
                let k = layer.per_gas.get(*gas).map_or(0.0, |s| s.values()[i]);
                row.push_str(&format!(",{k:e}"));
            }
            writeln!(file, "{row}").map_err(export_err)?;
        }
    }
    file.flush().map_err(export_err)
}
