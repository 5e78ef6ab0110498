//! Isotopologue mass lookup.

use std::collections::BTreeMap;

use crate::catalog::IsotopologueRow;
use crate::domain::IsotopologueId;
use crate::error::LblError;

/// Highest isotopologue number a molecule may register.
pub const MAX_ISOTOPOLOGUES: u32 = 32;

/// Molecular mass [g mol-1] keyed by isotopologue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsotopologueMasses {
    masses: BTreeMap<IsotopologueId, f64>,
}

impl IsotopologueMasses {
    /// Build from catalog rows; HITRAN id `0` is stored as isotopologue 10.
    pub fn from_rows(rows: &[IsotopologueRow]) -> Result<Self, LblError> {
        let mut masses = BTreeMap::new();
        for row in rows {
            let id = IsotopologueId::from_hitran(row.isoid);
            if id.get() > MAX_ISOTOPOLOGUES {
                return Err(LblError::CapacityExceeded {
                    what: "isotopologue number",
                    capacity: MAX_ISOTOPOLOGUES as usize,
                });
            }
            if !(row.mass.is_finite() && row.mass > 0.0) {
                return Err(LblError::catalog(format!(
                    "Isotopologue {} has invalid mass {}.",
                    id.get(),
                    row.mass
                )));
            }
            masses.insert(id, row.mass);
        }
        Ok(Self { masses })
    }

    pub fn mass_of(&self, id: IsotopologueId) -> Result<f64, LblError> {
        self.masses
            .get(&id)
            .copied()
            .ok_or(LblError::UnknownIsotopologue { isotopologue: id.get() })
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}
