//! A molecule's catalog data, loaded once and evaluated many times.

use crate::catalog::{IsotopologueMasses, LineCatalog, MoleculeId, PartitionTable, Transition};
use crate::domain::{AbsorptionSpectrum, AccumulationSettings, Conditions, SpectralGrid};
use crate::error::LblError;
use crate::spectra::{LineStats, accumulate_lines};

/// Catalog data of one molecule, detached from the catalog it came from.
#[derive(Debug, Clone)]
pub struct PreparedMolecule {
    formula: String,
    id: MoleculeId,
    tips: Option<PartitionTable>,
    masses: IsotopologueMasses,
    lines: Vec<Transition>,
}

impl PreparedMolecule {
    pub fn load<C: LineCatalog + ?Sized>(catalog: &C, formula: &str) -> Result<Self, LblError> {
        let id = catalog.resolve_molecule_id(formula)?;
        let tips = catalog.load_partition_table(id)?;
        if tips.is_none() {
            log::warn!("No partition data for {formula}; its lines are not evaluated.");
        }
        let masses = catalog.load_isotopologue_masses(id)?;
        let lines = catalog.stream_lines(id)?.collect::<Result<Vec<_>, _>>()?;
        log::debug!("Prepared {formula} (id {}): {} lines", id.0, lines.len());
        Ok(Self {
            formula: formula.to_string(),
            id,
            tips,
            masses,
            lines,
        })
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn id(&self) -> MoleculeId {
        self.id
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn has_partition_data(&self) -> bool {
        self.tips.is_some()
    }

    /// Same result as `compute_absorption` against the originating catalog.
    pub fn absorption(
        &self,
        conditions: &Conditions,
        grid: &SpectralGrid,
        settings: &AccumulationSettings,
    ) -> Result<AbsorptionSpectrum, LblError> {
        self.absorption_detailed(conditions, grid, settings)
            .map(|(spectrum, _)| spectrum)
    }

    pub fn absorption_detailed(
        &self,
        conditions: &Conditions,
        grid: &SpectralGrid,
        settings: &AccumulationSettings,
    ) -> Result<(AbsorptionSpectrum, LineStats), LblError> {
        conditions.validate()?;
        let mut spectrum = AbsorptionSpectrum::zeros(*grid);
        let Some(tips) = &self.tips else {
            return Ok((spectrum, LineStats::default()));
        };
        let stats = accumulate_lines(
            self.lines.iter().copied().map(Ok),
            &self.masses,
            tips,
            conditions,
            grid,
            settings,
            spectrum.values_mut(),
        )?;
        Ok((spectrum, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SynthConfig, generate_catalog};
    use crate::spectra::compute_absorption;

    #[test]
    fn matches_direct_computation_for_several_states() {
        let config = SynthConfig::default();
        let catalog = generate_catalog(&config).unwrap();
        let prepared = PreparedMolecule::load(&catalog, &config.formula).unwrap();
        assert_eq!(prepared.line_count(), config.line_count);
        assert!(prepared.has_partition_data());

        let grid = SpectralGrid::new(config.v0, config.vn, 20).unwrap();
        let settings = AccumulationSettings::default();
        for (pressure, temperature) in [(101325.0, 296.0), (50000.0, 250.0), (1000.0, 220.0)] {
            let conditions = Conditions {
                pressure,
                temperature,
                mixing_ratio: 4e-4,
            };
            let direct = compute_absorption(&catalog, &conditions, &grid, &settings, &config.formula).unwrap();
            let cached = prepared.absorption(&conditions, &grid, &settings).unwrap();
            assert_eq!(direct.values(), cached.values(), "p = {pressure}, T = {temperature}");
        }
    }

    #[test]
    fn unknown_formula_fails_to_load() {
        let catalog = generate_catalog(&SynthConfig::default()).unwrap();
        assert!(matches!(
            PreparedMolecule::load(&catalog, "O3"),
            Err(LblError::MoleculeNotFound { .. })
        ));
    }
}
