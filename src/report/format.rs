//! Formatted terminal output.
//!
//! Formatting lives here so the numerical modules stay free of presentation.

use crate::catalog::MemoryCatalog;
use crate::domain::{AccumulationSettings, AtmosphereLayer, Conditions};
use crate::report::SpectrumSummary;
use crate::spectra::{LayerAbsorption, LineStats};

/// Summary of a single-molecule run.
pub fn format_summary(
    molecule: &str,
    conditions: &Conditions,
    settings: &AccumulationSettings,
    summary: &SpectrumSummary,
    stats: Option<&LineStats>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== lbl - {molecule} absorption ===\n"));
    out.push_str(&format!(
        "Conditions: p={:.2} Pa | T={:.2} K | vmr={:.4e}\n",
        conditions.pressure, conditions.temperature, conditions.mixing_ratio
    ));
    out.push_str(&format!(
        "Line handling: cut-off={} cm-1 | pedestal removal={}\n",
        settings.cut_off,
        if settings.remove_pedestal { "on" } else { "off" }
    ));
    if let Some(stats) = stats {
        out.push_str(&format!(
            "Lines: accumulated={} | skipped below grid={}",
            stats.accumulated, stats.skipped_below
        ));
        if let Some(nu) = stats.stopped_at {
            out.push_str(&format!(" | stopped at {nu:.4} cm-1"));
        }
        out.push('\n');
    }
    out.push_str(&format_spectrum_stats(summary));
    out
}

/// One line per layer: state, gas count, peak and integral of the total.
pub fn format_layers_summary(layers: &[AtmosphereLayer], results: &[LayerAbsorption]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>5} {:>12} {:>8} {:>5} {:>14} {:>12} {:>12}\n",
        "layer", "p [Pa]", "T [K]", "gases", "peak at [cm-1]", "peak [m-1]", "integral"
    ));
    out.push_str(&format!(
        "{:-<5} {:-<12} {:-<8} {:-<5} {:-<14} {:-<12} {:-<12}\n",
        "", "", "", "", "", "", ""
    ));
    for (index, (layer, result)) in layers.iter().zip(results).enumerate() {
        let summary = crate::report::summarize(&result.total);
        let (at, peak) = summary.peak.unwrap_or((f64::NAN, 0.0));
        out.push_str(&format!(
            "{index:>5} {:>12.2} {:>8.2} {:>5} {at:>14.4} {peak:>12.4e} {:>12.4e}\n",
            layer.pressure,
            layer.temperature,
            result.per_gas.len(),
            summary.integrated
        ));
    }
    out
}

/// Molecules of a catalog with line counts and wavenumber coverage.
pub fn format_catalog_summary(catalog: &MemoryCatalog) -> String {
    let mut out = String::new();
    for m in catalog.molecules() {
        let span = match (m.transitions.first(), m.transitions.last()) {
            (Some(first), Some(last)) => format!("[{:.4}, {:.4}] cm-1", first.nu, last.nu),
            _ => "no lines".to_string(),
        };
        out.push_str(&format!(
            "{:<8} id={:<4} lines={:<8} isotopologues={:<3} tips rows={:<7} {span}\n",
            m.formula,
            m.id.0,
            m.transitions.len(),
            m.isotopologues.len(),
            m.tips.len()
        ));
    }
    out
}

/// Top-N `(wavenumber, value)` table.
pub fn format_strongest(points: &[(f64, f64)]) -> String {
    let mut out = String::from("Strongest points:\n");
    for (wavenumber, value) in points {
        out.push_str(&format!("  {wavenumber:>12.4} cm-1  {value:.6e}\n"));
    }
    out
}

fn format_spectrum_stats(summary: &SpectrumSummary) -> String {
    let mut out = format!(
        "Grid: {} points ({} nonzero)\n",
        summary.points, summary.nonzero
    );
    match summary.peak {
        Some((at, value)) => out.push_str(&format!("Peak: {value:.6e} at {at:.4} cm-1\n")),
        None => out.push_str("Peak: n/a (empty grid)\n"),
    }
    out.push_str(&format!(
        "Min: {:.6e} | Integrated: {:.6e}\n",
        summary.min, summary.integrated
    ));
    out
}
