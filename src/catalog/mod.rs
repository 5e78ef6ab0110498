//! Line-parameter catalog: the contract the absorption driver consumes.
//!
//! A catalog resolves molecule formulas to ids and serves, per molecule:
//!
//! - TIPS rows, staged into a `PartitionTable`
//! - isotopologue masses
//! - transitions, streamed in ascending order of center wavenumber
//!
//! The ascending order is part of the contract: the driver stops reading as soon
//! as a line lies beyond the grid's reach, and rejects streams that go backwards.

use serde::{Deserialize, Serialize};

use crate::domain::{IsotopologueId, LineRecord};
use crate::error::LblError;

pub mod mass;
pub mod memory;
pub mod partition;

pub use mass::*;
pub use memory::*;
pub use partition::*;

/// Catalog-internal molecule identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoleculeId(pub i64);

/// Raw HITRAN transition parameters as stored in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub nu: f64,
    pub sw: f64,
    pub gamma_air: f64,
    pub gamma_self: f64,
    pub n_air: f64,
    pub elower: f64,
    #[serde(default)]
    pub delta_air: f64,
    pub local_iso_id: u32,
}

impl Transition {
    /// Reject parameters that cannot produce a finite line shape.
    pub fn check(&self) -> Result<(), String> {
        if !(self.nu.is_finite() && self.nu > 0.0) {
            return Err(format!("Line center must be finite and > 0 cm-1, got {}", self.nu));
        }
        if !(self.sw.is_finite() && self.sw >= 0.0) {
            return Err(format!("Line strength must be finite and >= 0, got {}", self.sw));
        }
        for (name, value) in [("gamma_air", self.gamma_air), ("gamma_self", self.gamma_self)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("`{name}` must be finite and >= 0, got {value}"));
            }
        }
        let others = [
            ("n_air", self.n_air),
            ("elower", self.elower),
            ("delta_air", self.delta_air),
        ];
        if let Some((name, value)) = others.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("`{name}` must be finite, got {value}"));
        }
        Ok(())
    }

    /// Attach the isotopologue mass and apply the HITRAN id alias.
    pub fn to_line_record(&self, masses: &IsotopologueMasses) -> Result<LineRecord, LblError> {
        let isotopologue = IsotopologueId::from_hitran(self.local_iso_id);
        Ok(LineRecord {
            nu: self.nu,
            sw: self.sw,
            gamma_air: self.gamma_air,
            gamma_self: self.gamma_self,
            n_air: self.n_air,
            e_lower: self.elower,
            delta_air: self.delta_air,
            isotopologue,
            mass: masses.mass_of(isotopologue)?,
        })
    }
}

/// One TIPS sample: partition sum of an isotopologue at one temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TipsRow {
    pub isotopologue_id: u32,
    pub temperature: f64,
    pub data: f64,
}

/// Molecular mass of one isotopologue [g mol-1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsotopologueRow {
    pub isoid: u32,
    pub mass: f64,
}

/// Lazily produced transitions.
pub type TransitionStream<'a> = Box<dyn Iterator<Item = Result<Transition, LblError>> + 'a>;

/// Read access to a spectroscopic line catalog.
///
/// Implementations own whatever connection they need; dropping the catalog
/// releases it, so a borrowed catalog is held exactly for the duration of one
/// computation.
pub trait LineCatalog {
    /// Map a formula or alias (e.g. `"CO2"`) to the catalog id.
    fn resolve_molecule_id(&self, formula: &str) -> Result<MoleculeId, LblError>;

    /// Partition table for the molecule, `None` when no TIPS data is stored.
    fn load_partition_table(&self, id: MoleculeId) -> Result<Option<PartitionTable>, LblError>;

    fn load_isotopologue_masses(&self, id: MoleculeId) -> Result<IsotopologueMasses, LblError>;

    /// Transitions of the molecule, ascending by `nu`.
    fn stream_lines(&self, id: MoleculeId) -> Result<TransitionStream<'_>, LblError>;
}
