//! Reporting utilities: spectrum statistics and formatted terminal output.

use crate::domain::AbsorptionSpectrum;

pub mod format;

pub use format::*;

/// Headline numbers of one spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSummary {
    pub points: usize,
    /// `(wavenumber, value)` of the maximum.
    pub peak: Option<(f64, f64)>,
    pub min: f64,
    /// Rectangle-rule integral over wavenumber.
    pub integrated: f64,
    pub nonzero: usize,
}

pub fn summarize(spectrum: &AbsorptionSpectrum) -> SpectrumSummary {
    let values = spectrum.values();
    SpectrumSummary {
        points: values.len(),
        peak: spectrum.peak(),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        integrated: spectrum.integrated(),
        nonzero: values.iter().filter(|v| **v != 0.0).count(),
    }
}

/// The `top_n` largest values as `(wavenumber, value)`, strongest first.
pub fn strongest_points(spectrum: &AbsorptionSpectrum, top_n: usize) -> Vec<(f64, f64)> {
    let mut indexed: Vec<(usize, f64)> = spectrum.values().iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    indexed
        .into_iter()
        .take(top_n)
        .map(|(i, v)| (spectrum.grid().wavenumber(i), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpectralGrid;

    fn spectrum() -> AbsorptionSpectrum {
        let mut s = AbsorptionSpectrum::zeros(SpectralGrid::new(10, 12, 2).unwrap());
        s.values_mut().copy_from_slice(&[0.0, 3.0, 1.0, 3.0]);
        s
    }

    #[test]
    fn summary_counts_and_integrates() {
        let summary = summarize(&spectrum());
        assert_eq!(summary.points, 4);
        assert_eq!(summary.nonzero, 3);
        assert_eq!(summary.peak, Some((10.5, 3.0)));
        assert_eq!(summary.min, 0.0);
        assert!((summary.integrated - 3.5).abs() < 1e-12);
    }

    #[test]
    fn strongest_points_break_ties_by_wavenumber() {
        let top = strongest_points(&spectrum(), 3);
        assert_eq!(top, vec![(10.5, 3.0), (11.5, 3.0), (11.0, 1.0)]);
        assert_eq!(strongest_points(&spectrum(), 10).len(), 4);
    }
}
