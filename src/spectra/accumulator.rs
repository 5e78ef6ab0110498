//! Per-line accumulation onto the output grid.

use std::ops::RangeInclusive;

use crate::catalog::PartitionTable;
use crate::domain::{AccumulationSettings, Conditions, LineRecord, SpectralGrid};
use crate::error::LblError;
use crate::math::voigt::VoigtProfile;
use crate::physics::LineShape;

/// Grid indices a line centered at `center` may touch.
///
/// The window spans `[floor(center) - cut_off, floor(center) + cut_off + 1]`
/// cm-1 clipped to the grid, and is `None` when it misses the grid entirely.
pub fn line_window(
    grid: &SpectralGrid,
    center: f64,
    cut_off: u32,
) -> Option<RangeInclusive<usize>> {
    let reach = cut_off as f64 + 1.0;
    if !(center >= grid.v0() as f64 - reach && center <= grid.vn() as f64 + reach) {
        return None;
    }
    let n = grid.len() as i128;
    let ppu = grid.points_per_unit() as i128;
    let v0 = grid.v0() as i128;
    let cut = cut_off as i128;
    let base = center.floor() as i128;

    let start = (base - cut - v0) * ppu;
    if start >= n {
        return None;
    }
    let end = (base + cut + 1 - v0) * ppu;
    if end < 0 {
        return None;
    }
    Some(start.max(0) as usize..=end.min(n - 1) as usize)
}

/// Add one line's absorption cross-section [m2] to `out`.
///
/// With `remove_pedestal` set, the lesser of the two window-edge values of `out`
/// right after this line was added is subtracted over the whole window. Tails of
/// earlier lines are part of that snapshot, later lines are not.
pub fn accumulate_line(
    conditions: &Conditions,
    line: &LineRecord,
    tips: &PartitionTable,
    grid: &SpectralGrid,
    settings: &AccumulationSettings,
    out: &mut [f64],
) -> Result<(), LblError> {
    check_buffer(grid, out)?;
    let shape = LineShape::derive(line, conditions, tips)?;
    if !(shape.alpha.is_finite() && shape.alpha > 0.0 && shape.gamma.is_finite() && shape.gamma >= 0.0) {
        return Err(LblError::catalog(format!(
            "Line at {} cm-1 has non-physical widths (doppler {}, collisional {}).",
            line.nu, shape.alpha, shape.gamma
        )));
    }
    let Some(window) = line_window(grid, shape.center, settings.cut_off) else {
        return Ok(());
    };

    let profile = VoigtProfile::new(shape.alpha, shape.gamma);
    profile.accumulate(grid, window.clone(), shape.center, shape.strength, out);

    if settings.remove_pedestal {
        let pedestal = out[*window.start()].min(out[*window.end()]);
        out[window].iter_mut().for_each(|v| *v -= pedestal);
    }
    Ok(())
}

/// Output buffers must cover the grid exactly.
pub(crate) fn check_buffer(grid: &SpectralGrid, out: &[f64]) -> Result<(), LblError> {
    if out.len() != grid.len() {
        return Err(LblError::invalid(format!(
            "Output buffer has {} points, grid has {}.",
            out.len(),
            grid.len()
        )));
    }
    Ok(())
}
