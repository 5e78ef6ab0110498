//! In-memory catalog.
//!
//! Molecules are registered as whole `MoleculeRecord`s (the same shape the JSON
//! catalog file stores). Transitions are sorted by center wavenumber on insert,
//! which is what makes `stream_lines` satisfy the ascending-order contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{
    IsotopologueMasses, IsotopologueRow, LineCatalog, MoleculeId, PartitionTable, TipsRow,
    Transition, TransitionStream, partition_table_from_rows,
};
use crate::error::LblError;

/// Everything the catalog stores for one molecule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoleculeRecord {
    pub id: MoleculeId,
    pub formula: String,
    /// Extra names resolving to this molecule (the formula always does).
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub isotopologues: Vec<IsotopologueRow>,
    #[serde(default)]
    pub tips: Vec<TipsRow>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    molecules: BTreeMap<MoleculeId, MoleculeRecord>,
    aliases: BTreeMap<String, MoleculeId>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a molecule. Ids and aliases must be unique across the catalog.
    pub fn insert(&mut self, mut molecule: MoleculeRecord) -> Result<(), LblError> {
        if self.molecules.contains_key(&molecule.id) {
            return Err(LblError::catalog(format!(
                "Duplicate molecule id {} ({}).",
                molecule.id.0, molecule.formula
            )));
        }
        for transition in &molecule.transitions {
            transition.check().map_err(|message| {
                LblError::catalog(format!("Transition of {}: {message}.", molecule.formula))
            })?;
        }

        let mut names = vec![molecule.formula.clone()];
        names.extend(molecule.aliases.iter().cloned());
        for name in &names {
            if let Some(existing) = self.aliases.get(name) {
                if *existing != molecule.id {
                    return Err(LblError::catalog(format!(
                        "Alias '{name}' already maps to molecule id {}.",
                        existing.0
                    )));
                }
            }
        }
        for name in names {
            self.aliases.insert(name, molecule.id);
        }

        molecule.transitions.sort_by(|a, b| a.nu.total_cmp(&b.nu));
        log::debug!(
            "Registered {} (id {}) with {} transitions",
            molecule.formula,
            molecule.id.0,
            molecule.transitions.len()
        );
        self.molecules.insert(molecule.id, molecule);
        Ok(())
    }

    pub fn molecules(&self) -> impl Iterator<Item = &MoleculeRecord> {
        self.molecules.values()
    }

    /// Registered formulas, ordered by molecule id.
    pub fn formulas(&self) -> Vec<&str> {
        self.molecules.values().map(|m| m.formula.as_str()).collect()
    }

    fn molecule(&self, id: MoleculeId) -> Result<&MoleculeRecord, LblError> {
        self.molecules
            .get(&id)
            .ok_or_else(|| LblError::catalog(format!("Unknown molecule id {}.", id.0)))
    }
}

impl LineCatalog for MemoryCatalog {
    fn resolve_molecule_id(&self, formula: &str) -> Result<MoleculeId, LblError> {
        self.aliases
            .get(formula)
            .copied()
            .ok_or_else(|| LblError::MoleculeNotFound {
                formula: formula.to_string(),
            })
    }

    fn load_partition_table(&self, id: MoleculeId) -> Result<Option<PartitionTable>, LblError> {
        partition_table_from_rows(&self.molecule(id)?.tips)
    }

    fn load_isotopologue_masses(&self, id: MoleculeId) -> Result<IsotopologueMasses, LblError> {
        IsotopologueMasses::from_rows(&self.molecule(id)?.isotopologues)
    }

    fn stream_lines(&self, id: MoleculeId) -> Result<TransitionStream<'_>, LblError> {
        let molecule = self.molecule(id)?;
        Ok(Box::new(molecule.transitions.iter().copied().map(Ok)))
    }
}
