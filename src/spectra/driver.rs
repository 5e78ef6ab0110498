//! Absorption driver: catalog lookups, ordered line streaming, early termination.

use crate::catalog::{IsotopologueMasses, LineCatalog, PartitionTable, Transition};
use crate::domain::{AbsorptionSpectrum, AccumulationSettings, Conditions, SpectralGrid};
use crate::error::LblError;
use crate::spectra::accumulate_line;
use crate::spectra::accumulator::check_buffer;

/// Bookkeeping of one pass over a line stream.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineStats {
    /// Lines handed to the accumulator.
    pub accumulated: usize,
    /// Lines too far below the grid to reach it.
    pub skipped_below: usize,
    /// Center of the first line beyond the grid's reach, where streaming stopped.
    pub stopped_at: Option<f64>,
}

/// Absorption spectrum of one molecule on `grid`.
///
/// Values are per absorber molecule; scale by a number density (see
/// [`crate::physics::number_density`]) for a volume absorption coefficient.
/// A molecule without partition data yields an all-zero spectrum.
pub fn compute_absorption<C: LineCatalog + ?Sized>(
    catalog: &C,
    conditions: &Conditions,
    grid: &SpectralGrid,
    settings: &AccumulationSettings,
    molecule: &str,
) -> Result<AbsorptionSpectrum, LblError> {
    compute_absorption_detailed(catalog, conditions, grid, settings, molecule)
        .map(|(spectrum, _)| spectrum)
}

/// Like [`compute_absorption`], also reporting how the line stream was consumed.
pub fn compute_absorption_detailed<C: LineCatalog + ?Sized>(
    catalog: &C,
    conditions: &Conditions,
    grid: &SpectralGrid,
    settings: &AccumulationSettings,
    molecule: &str,
) -> Result<(AbsorptionSpectrum, LineStats), LblError> {
    conditions.validate()?;
    let id = catalog.resolve_molecule_id(molecule)?;
    log::debug!("Resolved {molecule} to molecule id {}", id.0);

    let mut spectrum = AbsorptionSpectrum::zeros(*grid);
    let Some(tips) = catalog.load_partition_table(id)? else {
        log::warn!("No partition data for {molecule}; its lines are not evaluated.");
        return Ok((spectrum, LineStats::default()));
    };
    let masses = catalog.load_isotopologue_masses(id)?;
    let lines = catalog.stream_lines(id)?;

    let stats = accumulate_lines(
        lines,
        &masses,
        &tips,
        conditions,
        grid,
        settings,
        spectrum.values_mut(),
    )?;
    log::debug!(
        "{molecule}: {} lines accumulated, {} below the grid, stopped at {:?}",
        stats.accumulated,
        stats.skipped_below,
        stats.stopped_at
    );
    Ok((spectrum, stats))
}

/// Accumulate an ascending line stream into `out`.
///
/// Streaming stops at the first line centered beyond `vn + cut_off + 1`; lines
/// centered below `v0 - (cut_off + 1)` are skipped. A center smaller than its
/// predecessor is a catalog contract violation.
pub fn accumulate_lines<I>(
    lines: I,
    masses: &IsotopologueMasses,
    tips: &PartitionTable,
    conditions: &Conditions,
    grid: &SpectralGrid,
    settings: &AccumulationSettings,
    out: &mut [f64],
) -> Result<LineStats, LblError>
where
    I: IntoIterator<Item = Result<Transition, LblError>>,
{
    check_buffer(grid, out)?;
    let reach = settings.cut_off as f64 + 1.0;
    let lower = grid.v0() as f64 - reach;
    let upper = grid.vn() as f64 + reach;

    let mut stats = LineStats::default();
    let mut previous = f64::NEG_INFINITY;
    for transition in lines {
        let transition = transition?;
        let nu = transition.nu;
        if !(nu >= previous) {
            return Err(LblError::catalog(format!(
                "Line stream is not ascending: {nu} cm-1 follows {previous} cm-1."
            )));
        }
        previous = nu;

        if nu > upper {
            stats.stopped_at = Some(nu);
            break;
        }
        if nu < lower {
            stats.skipped_below += 1;
            continue;
        }
        let line = transition.to_line_record(masses)?;
        accumulate_line(conditions, &line, tips, grid, settings, out)?;
        stats.accumulated += 1;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        IsotopologueRow, MemoryCatalog, MoleculeId, MoleculeRecord, TipsRow, TransitionStream,
    };

    fn transition(nu: f64) -> Transition {
        Transition {
            nu,
            sw: 1e-20,
            gamma_air: 0.1,
            gamma_self: 0.1,
            n_air: 0.5,
            elower: 0.0,
            delta_air: 0.0,
            local_iso_id: 1,
        }
    }

    fn record(transitions: Vec<Transition>, with_tips: bool) -> MoleculeRecord {
        let tips = if with_tips {
            (200..=320)
                .map(|t| TipsRow {
                    isotopologue_id: 1,
                    temperature: t as f64,
                    data: 0.4 * t as f64,
                })
                .collect()
        } else {
            Vec::new()
        };
        MoleculeRecord {
            id: MoleculeId(2),
            formula: "CO2".to_string(),
            aliases: Vec::new(),
            isotopologues: vec![IsotopologueRow { isoid: 1, mass: 44.0 }],
            tips,
            transitions,
        }
    }

    fn catalog(transitions: Vec<Transition>) -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(record(transitions, true)).unwrap();
        catalog
    }

    fn conditions() -> Conditions {
        Conditions {
            pressure: 101325.0,
            temperature: 296.0,
            mixing_ratio: 0.01,
        }
    }

    fn grid() -> SpectralGrid {
        SpectralGrid::new(995, 1005, 100).unwrap()
    }

    fn settings() -> AccumulationSettings {
        AccumulationSettings {
            cut_off: 5,
            remove_pedestal: false,
        }
    }

    #[test]
    fn single_line_peaks_at_center_and_is_symmetric() {
        let spectrum =
            compute_absorption(&catalog(vec![transition(1000.0)]), &conditions(), &grid(), &settings(), "CO2")
                .unwrap();
        let k = spectrum.values();
        assert_eq!(k.len(), 1000);

        let center = 500;
        assert!((spectrum.grid().wavenumber(center) - 1000.0).abs() < 1e-9);
        let (peak_at, _) = spectrum.peak().unwrap();
        assert!((peak_at - 1000.0).abs() < 1e-9, "peak at {peak_at}");

        for d in 1..500 {
            let (left, right) = (k[center - d], k[center + d]);
            assert!(
                (left - right).abs() <= 1e-9 * left.abs(),
                "asymmetric at offset {d}: {left} vs {right}"
            );
            assert!(right < k[center + d - 1], "not decreasing at offset {d}");
        }
    }

    #[test]
    fn lines_beyond_reach_do_not_change_the_result() {
        let near = vec![transition(990.0), transition(1000.0), transition(1003.5)];
        let mut far = near.clone();
        far.extend([transition(1011.5), transition(1200.0), transition(5000.0)]);

        let (a, stats_a) =
            compute_absorption_detailed(&catalog(near), &conditions(), &grid(), &settings(), "CO2").unwrap();
        let (b, stats_b) =
            compute_absorption_detailed(&catalog(far), &conditions(), &grid(), &settings(), "CO2").unwrap();
        assert_eq!(a.values(), b.values());
        assert_eq!(stats_a.accumulated, 3);
        assert_eq!(stats_b.accumulated, 3);
        assert_eq!(stats_a.stopped_at, None);
        assert_eq!(stats_b.stopped_at, Some(1011.5));
    }

    #[test]
    fn lines_below_the_grid_are_skipped_not_terminal() {
        let lines = vec![transition(900.0), transition(988.5), transition(1000.0)];
        let (spectrum, stats) =
            compute_absorption_detailed(&catalog(lines), &conditions(), &grid(), &settings(), "CO2").unwrap();
        assert_eq!(stats.skipped_below, 2);
        assert_eq!(stats.accumulated, 1);
        assert!(spectrum.values()[500] > 0.0);
    }

    #[test]
    fn unknown_molecule_fails() {
        let err = compute_absorption(&catalog(vec![]), &conditions(), &grid(), &settings(), "N2O")
            .unwrap_err();
        assert!(matches!(err, LblError::MoleculeNotFound { ref formula } if formula == "N2O"));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn missing_partition_data_gives_zero_spectrum() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(record(vec![transition(1000.0)], false)).unwrap();
        let (spectrum, stats) =
            compute_absorption_detailed(&catalog, &conditions(), &grid(), &settings(), "CO2").unwrap();
        assert!(spectrum.values().iter().all(|v| *v == 0.0));
        assert_eq!(stats.accumulated, 0);
    }

    struct UnsortedCatalog;

    impl LineCatalog for UnsortedCatalog {
        fn resolve_molecule_id(&self, _formula: &str) -> Result<MoleculeId, LblError> {
            Ok(MoleculeId(1))
        }

        fn load_partition_table(&self, _id: MoleculeId) -> Result<Option<PartitionTable>, LblError> {
            crate::catalog::partition_table_from_rows(&record(vec![], true).tips)
        }

        fn load_isotopologue_masses(&self, _id: MoleculeId) -> Result<IsotopologueMasses, LblError> {
            IsotopologueMasses::from_rows(&[IsotopologueRow { isoid: 1, mass: 44.0 }])
        }

        fn stream_lines(&self, _id: MoleculeId) -> Result<TransitionStream<'_>, LblError> {
            let lines = [transition(1001.0), transition(999.0)];
            Ok(Box::new(lines.into_iter().map(Ok)))
        }
    }

    #[test]
    fn descending_stream_is_a_catalog_error() {
        let err = compute_absorption(&UnsortedCatalog, &conditions(), &grid(), &settings(), "CO2")
            .unwrap_err();
        assert!(matches!(err, LblError::CatalogAccess { .. }), "{err}");
    }

    #[test]
    fn stream_errors_propagate() {
        let tips = crate::catalog::partition_table_from_rows(&record(vec![], true).tips)
            .unwrap()
            .unwrap();
        let masses = IsotopologueMasses::from_rows(&[IsotopologueRow { isoid: 1, mass: 44.0 }]).unwrap();
        let lines = vec![Ok(transition(1000.0)), Err(LblError::catalog("connection lost"))];
        let mut out = vec![0.0; grid().len()];
        let err = accumulate_lines(lines, &masses, &tips, &conditions(), &grid(), &settings(), &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("connection lost"));
    }

    #[test]
    fn invalid_conditions_are_rejected_before_lookup() {
        let bad = Conditions {
            temperature: -1.0,
            ..conditions()
        };
        let err = compute_absorption(&catalog(vec![]), &bad, &grid(), &settings(), "N2O").unwrap_err();
        assert!(matches!(err, LblError::InvalidInput(_)));
    }

    #[test]
    fn output_buffer_must_match_the_grid() {
        let tips = crate::catalog::partition_table_from_rows(&record(vec![], true).tips)
            .unwrap()
            .unwrap();
        let masses = IsotopologueMasses::from_rows(&[IsotopologueRow { isoid: 1, mass: 44.0 }]).unwrap();
        let mut out = vec![0.0; 10];
        let err = accumulate_lines(
            vec![Ok(transition(1000.0))],
            &masses,
            &tips,
            &conditions(),
            &grid(),
            &settings(),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, LblError::InvalidInput(_)));
        assert!(out.iter().all(|v| *v == 0.0));
    }
}
