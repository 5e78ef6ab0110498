//! Total internal partition sums (TIPS) and their interpolation.
//!
//! Tables are rectangular: every isotopologue is sampled at the same number of
//! temperatures, at unit spacing on integer temperatures. That layout allows an
//! O(1) bucket lookup: `i = floor(T) - t[0]`.

use crate::catalog::TipsRow;
use crate::error::LblError;

/// Hard ceiling on staged TIPS samples per molecule.
pub const MAX_PARTITION_SAMPLES: usize = 150_000;

/// Partition sums for all isotopologues of one molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionTable {
    isotopologue_count: usize,
    samples_per_isotopologue: usize,
    /// Row-major `[isotopologue][sample]`.
    temperature: Vec<f64>,
    data: Vec<f64>,
}

impl PartitionTable {
    pub fn isotopologue_count(&self) -> usize {
        self.isotopologue_count
    }

    pub fn samples_per_isotopologue(&self) -> usize {
        self.samples_per_isotopologue
    }

    /// Sampled temperature span `[min, max]` of one isotopologue.
    pub fn temperature_range(&self, isotopologue: usize) -> Option<(f64, f64)> {
        let (t, _) = self.segment(isotopologue)?;
        Some((t[0], t[t.len() - 1]))
    }

    fn segment(&self, isotopologue: usize) -> Option<(&[f64], &[f64])> {
        if isotopologue >= self.isotopologue_count {
            return None;
        }
        let start = isotopologue * self.samples_per_isotopologue;
        let end = start + self.samples_per_isotopologue;
        Some((&self.temperature[start..end], &self.data[start..end]))
    }

    /// Linearly interpolated partition sum of zero-based `isotopologue` at `temperature` [K].
    pub fn total_partition_function(
        &self,
        temperature: f64,
        isotopologue: usize,
    ) -> Result<f64, LblError> {
        let Some((t, data)) = self.segment(isotopologue) else {
            return Err(LblError::OutOfRange {
                isotopologue,
                temperature,
                min: f64::NAN,
                max: f64::NAN,
            });
        };
        let (min, max) = (t[0], t[t.len() - 1]);
        if !(temperature >= min && temperature <= max) {
            return Err(LblError::OutOfRange {
                isotopologue,
                temperature,
                min,
                max,
            });
        }

        // The last sample has no right neighbour; interpolate on the final segment.
        let i = (temperature.floor() - min.floor()) as usize;
        let i = i.min(t.len() - 2);
        Ok(data[i] + (data[i + 1] - data[i]) * (temperature - t[i]) / (t[i + 1] - t[i]))
    }
}

/// Stages TIPS rows as they arrive from the catalog.
///
/// Rows are grouped by isotopologue in encounter order: a change of
/// `isotopologue_id` starts the next isotopologue.
#[derive(Debug, Clone)]
pub struct PartitionTableBuilder {
    capacity: usize,
    isotopologue_count: usize,
    current: Option<u32>,
    temperature: Vec<f64>,
    data: Vec<f64>,
}

impl Default for PartitionTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PartitionTableBuilder {
    pub fn new() -> Self {
        Self::with_capacity(MAX_PARTITION_SAMPLES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            isotopologue_count: 0,
            current: None,
            temperature: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn push(&mut self, row: TipsRow) -> Result<(), LblError> {
        if self.temperature.len() >= self.capacity {
            return Err(LblError::CapacityExceeded {
                what: "partition table sample count",
                capacity: self.capacity,
            });
        }
        if self.current != Some(row.isotopologue_id) {
            self.isotopologue_count += 1;
            self.current = Some(row.isotopologue_id);
        }
        self.temperature.push(row.temperature);
        self.data.push(row.data);
        Ok(())
    }

    /// `Ok(None)` when no rows were staged.
    pub fn build(self) -> Result<Option<PartitionTable>, LblError> {
        if self.isotopologue_count == 0 {
            return Ok(None);
        }
        let total = self.temperature.len();
        let per_iso = total / self.isotopologue_count;
        if per_iso * self.isotopologue_count != total {
            return Err(LblError::catalog(format!(
                "TIPS data is not rectangular: {total} samples over {} isotopologues.",
                self.isotopologue_count
            )));
        }
        if per_iso < 2 {
            return Err(LblError::catalog(
                "TIPS data needs at least two temperatures per isotopologue.",
            ));
        }
        for (iso, t) in self.temperature.chunks(per_iso).enumerate() {
            let unit_spaced = t[0].fract() == 0.0 && t.windows(2).all(|w| w[1] - w[0] == 1.0);
            if !unit_spaced {
                return Err(LblError::catalog(format!(
                    "TIPS temperatures of isotopologue index {iso} are not integer-valued at unit spacing."
                )));
            }
        }
        Ok(Some(PartitionTable {
            isotopologue_count: self.isotopologue_count,
            samples_per_isotopologue: per_iso,
            temperature: self.temperature,
            data: self.data,
        }))
    }
}

/// Stage a full row list into a table.
pub fn partition_table_from_rows(rows: &[TipsRow]) -> Result<Option<PartitionTable>, LblError> {
    let mut builder = PartitionTableBuilder::new();
    for row in rows {
        builder.push(*row)?;
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(isos: &[u32], t_min: u32, t_max: u32, q: impl Fn(u32, f64) -> f64) -> Vec<TipsRow> {
        let mut out = Vec::new();
        for &iso in isos {
            for t in t_min..=t_max {
                out.push(TipsRow {
                    isotopologue_id: iso,
                    temperature: t as f64,
                    data: q(iso, t as f64),
                });
            }
        }
        out
    }

    fn table() -> PartitionTable {
        partition_table_from_rows(&rows(&[1, 2], 70, 500, |iso, t| iso as f64 * t * t))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn exact_at_samples() {
        let tips = table();
        assert_eq!(tips.isotopologue_count(), 2);
        for t in [70, 71, 296, 499, 500] {
            let t = t as f64;
            assert_eq!(tips.total_partition_function(t, 0).unwrap(), t * t);
            assert_eq!(tips.total_partition_function(t, 1).unwrap(), 2.0 * t * t);
        }
    }

    #[test]
    fn linear_and_monotonic_between_samples() {
        let tips = table();
        let lo = tips.total_partition_function(279.0, 0).unwrap();
        let hi = tips.total_partition_function(280.0, 0).unwrap();
        let mid = tips.total_partition_function(279.5, 0).unwrap();
        assert!((mid - 0.5 * (lo + hi)).abs() < 1e-9);

        let mut prev = lo;
        for k in 1..=20 {
            let v = tips.total_partition_function(279.0 + k as f64 * 0.05, 0).unwrap();
            assert!(v >= prev, "not monotonic at step {k}");
            prev = v;
        }
    }

    #[test]
    fn out_of_range_temperature_or_isotopologue() {
        let tips = table();
        assert!(matches!(
            tips.total_partition_function(69.5, 0),
            Err(LblError::OutOfRange { min, max, .. }) if min == 70.0 && max == 500.0
        ));
        assert!(tips.total_partition_function(500.5, 1).is_err());
        assert!(tips.total_partition_function(296.0, 2).is_err());
        assert!(tips.total_partition_function(f64::NAN, 0).is_err());
        assert_eq!(tips.temperature_range(1), Some((70.0, 500.0)));
    }

    #[test]
    fn empty_rows_mean_no_table() {
        assert!(partition_table_from_rows(&[]).unwrap().is_none());
    }

    #[test]
    fn ragged_tables_are_rejected() {
        let mut r = rows(&[1, 2], 100, 110, |_, t| t);
        r.pop();
        let err = partition_table_from_rows(&r).unwrap_err();
        assert!(matches!(err, LblError::CatalogAccess { .. }));
    }

    #[test]
    fn non_unit_spacing_is_rejected() {
        let r: Vec<TipsRow> = (0..10)
            .map(|i| TipsRow {
                isotopologue_id: 1,
                temperature: 100.0 + 2.0 * i as f64,
                data: 1.0,
            })
            .collect();
        assert!(partition_table_from_rows(&r).is_err());
    }

    #[test]
    fn staging_ceiling_is_enforced() {
        let mut builder = PartitionTableBuilder::with_capacity(5);
        for row in rows(&[1], 1, 5, |_, t| t) {
            builder.push(row).unwrap();
        }
        let err = builder
            .push(TipsRow {
                isotopologue_id: 1,
                temperature: 6.0,
                data: 6.0,
            })
            .unwrap_err();
        assert!(matches!(err, LblError::CapacityExceeded { capacity: 5, .. }));
    }
}
