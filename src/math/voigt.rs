//! Voigt line shape via Humlicek's rational approximations.
//!
//! The profile is evaluated in reduced units:
//!
//! - `x = (v - nu) * sqrt(ln 2) / alpha`
//! - `y = gamma * sqrt(ln 2) / alpha`
//!
//! where `alpha` is the Doppler HWHM and `gamma` the collisional HWHM. The real
//! part of the scaled complex error function, `K(x, y)`, integrates to `sqrt(pi)`
//! over `x`, so the line-shape density in wavenumber space is
//! `K(x, y) * sqrt(ln 2) / (alpha * sqrt(pi))`.
//!
//! `K` is approximated piecewise (Wells' arrangement of Humlicek's W4 and CPF12):
//!
//! ```text
//!   |x| >= xlim0            region 0: Lorentzian asymptote
//!   xlim1 <= |x| < xlim0    region 1: 2nd order rational in x^2
//!   xlim2 <= |x| < xlim1    region 2: 4th order rational in x^2
//!   |x| < min(xlim2, xlim3) region 3: 5th order rational, 11-term polynomials in y
//!   otherwise               CPF12: six-term sum, split at xlim4
//! ```
//!
//! Every boundary and every rational coefficient depends on `y` only, so they are
//! computed once per line in `VoigtProfile::new` and reused for each grid point.

use std::f64::consts::{LN_2, PI};
use std::ops::RangeInclusive;

use crate::domain::SpectralGrid;

/// At and above this `y` the profile is indistinguishable from a Lorentzian.
pub const LORENTZ_ONLY_Y: f64 = 70.55;

/// Below this `y` the region 1/2 rational forms lose precision and are skipped.
const DEGENERATE_Y: f64 = 1e-6;

/// Above this `y` region 1 extends down to the line center.
const REGION1_TO_CENTER_Y: f64 = 8.425;

const CPF12_Y0: f64 = 1.5;
const CPF12_C: [f64; 6] = [
    1.0117281,
    -0.75197147,
    0.012557727,
    0.010022008,
    -0.00024206814,
    0.00000050084806,
];
const CPF12_S: [f64; 6] = [
    1.393237,
    0.23115241,
    -0.15535147,
    0.0062183662,
    0.000091908299,
    -0.00000062752596,
];
const CPF12_T: [f64; 6] = [
    0.31424038, 0.94778839, 1.5976826, 2.2795071, 3.0206370, 3.8897249,
];

/// `sqrt(pi)`, truncated as in Humlicek's region 3 coefficients.
const REGION3_SQRT_PI: f64 = 1.7724538;

/// Approximation regime chosen for a reduced offset `|x|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Lorentz,
    W4Region1,
    W4Region2,
    W4Region3,
    Cpf12Inner,
    Cpf12Outer,
}

/// Region limits on `|x|` for a fixed `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    pub xlim0: f64,
    pub xlim1: f64,
    pub xlim2: f64,
    pub xlim3: f64,
    pub xlim4: f64,
}

impl RegionBounds {
    fn for_y(y: f64) -> Self {
        if y >= LORENTZ_ONLY_Y {
            // xlim0 reaches zero here; everything is region 0.
            return Self {
                xlim0: 0.0,
                xlim1: 0.0,
                xlim2: 0.0,
                xlim3: 0.0,
                xlim4: 0.0,
            };
        }
        let xlim0 = (15100.0 + y * (40.0 - y * 3.6)).sqrt();
        let mut xlim1 = if y >= REGION1_TO_CENTER_Y {
            0.0
        } else {
            (164.0 - y * (4.3 + y * 1.8)).sqrt()
        };
        let mut xlim2 = 6.8 - y;
        if y <= DEGENERATE_Y {
            xlim1 = xlim0;
            xlim2 = xlim0;
        }
        Self {
            xlim0,
            xlim1,
            xlim2,
            xlim3: 2.4 * y,
            xlim4: 18.1 * y + 1.65,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Region1Coefficients {
    a0: f64,
    d0: f64,
    d2: f64,
}

impl Region1Coefficients {
    fn new(yq: f64) -> Self {
        let a0 = yq + 0.5;
        Self {
            a0,
            d0: a0 * a0,
            d2: yq + yq - 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Region2Coefficients {
    h0: f64,
    h2: f64,
    h4: f64,
    h6: f64,
    e0: f64,
    e2: f64,
    e4: f64,
}

impl Region2Coefficients {
    fn new(yq: f64) -> Self {
        let h6 = -6.0 + yq * 4.0;
        Self {
            h0: 0.5625 + yq * (4.5 + yq * (10.5 + yq * (6.0 + yq))),
            h2: -4.5 + yq * (9.0 + yq * (6.0 + yq * 4.0)),
            h4: 10.5 - yq * (6.0 - yq * 6.0),
            h6,
            e0: 1.875 + yq * (8.25 + yq * (5.5 + yq)),
            e2: 5.25 + yq * (1.0 + yq * 3.0),
            e4: 0.75 * h6,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Region3Coefficients {
    z: [f64; 5],
    p: [f64; 5],
}

impl Region3Coefficients {
    #[allow(clippy::excessive_precision)]
    fn new(y: f64) -> Self {
        let z0 = 272.1014
            + y * (1280.829
                + y * (2802.870
                    + y * (3764.966
                        + y * (3447.629
                            + y * (2256.981
                                + y * (1074.409
                                    + y * (369.1989 + y * (88.26741 + y * (13.39880 + y)))))))));
        let z2 = 211.678
            + y * (902.3066
                + y * (1758.336
                    + y * (2037.310
                        + y * (1549.675
                            + y * (793.4273 + y * (266.2987 + y * (53.59518 + y * 5.0)))))));
        let z4 = 78.86585
            + y * (308.1852
                + y * (497.3014 + y * (479.2576 + y * (269.2916 + y * (80.39278 + y * 10.0)))));
        let z6 = 22.03523 + y * (55.02933 + y * (92.75679 + y * (53.59518 + y * 10.0)));
        let z8 = 1.496460 + y * (13.39880 + y * 5.0);

        let p0 = 153.5168
            + y * (549.3954
                + y * (919.4955
                    + y * (946.8970
                        + y * (662.8097
                            + y * (328.2151
                                + y * (115.3772 + y * (27.93941 + y * (4.264678 + y * 0.3183291))))))));
        let p2 = -34.16955
            + y * (-1.322256
                + y * (124.5975
                    + y * (189.7730
                        + y * (139.4665 + y * (56.81652 + y * (12.79458 + y * 1.2733163))))));
        let p4 = 2.584042
            + y * (10.46332 + y * (24.01655 + y * (29.81482 + y * (12.79568 + y * 1.9099744))));
        let p6 = -0.07272979 + y * (0.9377051 + y * (4.266322 + y * 1.273316));
        let p8 = 0.0005480304 + y * 0.3183291;

        Self {
            z: [z0, z2, z4, z6, z8],
            p: [p0, p2, p4, p6, p8],
        }
    }
}

/// Voigt profile for one line: Doppler and collisional widths fixed.
///
/// Construction evaluates all `y`-dependent state; `density` is then cheap enough
/// to call for every grid point in a line's window. Instances are per line and are
/// never shared between lines.
#[derive(Debug, Clone, Copy)]
pub struct VoigtProfile {
    /// `sqrt(ln 2) / alpha` [cm].
    repwid: f64,
    y: f64,
    yq: f64,
    bounds: RegionBounds,
    region1: Region1Coefficients,
    region2: Region2Coefficients,
    region3: Region3Coefficients,
}

impl VoigtProfile {
    /// `alpha`: Doppler HWHM [cm-1], `gamma`: collisional HWHM [cm-1].
    pub fn new(alpha: f64, gamma: f64) -> Self {
        let repwid = LN_2.sqrt() / alpha;
        let y = repwid * gamma;
        let yq = y * y;
        Self {
            repwid,
            y,
            yq,
            bounds: RegionBounds::for_y(y),
            region1: Region1Coefficients::new(yq),
            region2: Region2Coefficients::new(yq),
            region3: Region3Coefficients::new(y),
        }
    }

    /// Reduced collisional width `y`.
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn bounds(&self) -> RegionBounds {
        self.bounds
    }

    /// Regime used at reduced offset `x`.
    pub fn region(&self, x: f64) -> Region {
        let b = &self.bounds;
        let abx = x.abs();
        if abx >= b.xlim0 {
            Region::Lorentz
        } else if abx >= b.xlim1 {
            Region::W4Region1
        } else if abx >= b.xlim2 {
            Region::W4Region2
        } else if abx < b.xlim3 {
            Region::W4Region3
        } else if abx <= b.xlim4 {
            Region::Cpf12Inner
        } else {
            Region::Cpf12Outer
        }
    }

    /// Real part of the scaled complex error function, `K(x, y)`.
    pub fn kernel(&self, x: f64) -> f64 {
        let y = self.y;
        let xq = x * x;
        match self.region(x) {
            Region::Lorentz => y / PI.sqrt() / (xq + self.yq),
            Region::W4Region1 => {
                let c = &self.region1;
                let d = 1.0 / PI.sqrt() / (c.d0 + xq * (c.d2 + xq));
                d * y * (c.a0 + xq)
            }
            Region::W4Region2 => {
                let c = &self.region2;
                let d = 1.0 / PI.sqrt() / (c.h0 + xq * (c.h2 + xq * (c.h4 + xq * (c.h6 + xq))));
                d * y * (c.e0 + xq * (c.e2 + xq * (c.e4 + xq)))
            }
            Region::W4Region3 => {
                let Region3Coefficients { z, p } = &self.region3;
                let d = REGION3_SQRT_PI
                    / (z[0] + xq * (z[1] + xq * (z[2] + xq * (z[3] + xq * (z[4] + xq)))));
                d * (p[0] + xq * (p[1] + xq * (p[2] + xq * (p[3] + xq * p[4]))))
            }
            Region::Cpf12Inner => self.cpf12_inner(x),
            Region::Cpf12Outer => self.cpf12_outer(x, xq),
        }
    }

    fn cpf12_inner(&self, x: f64) -> f64 {
        let ypy0 = self.y + CPF12_Y0;
        let ypy0q = ypy0 * ypy0;
        let mut sum = 0.0;
        for j in 0..6 {
            let dm = x - CPF12_T[j];
            let mf = 1.0 / (dm * dm + ypy0q);
            let dp = x + CPF12_T[j];
            let pf = 1.0 / (dp * dp + ypy0q);
            let (xm, ym) = (mf * dm, mf * ypy0);
            let (xp, yp) = (pf * dp, pf * ypy0);
            sum += CPF12_C[j] * (ym + yp) - CPF12_S[j] * (xm - xp);
        }
        sum
    }

    fn cpf12_outer(&self, x: f64, xq: f64) -> f64 {
        let y0q = CPF12_Y0 * CPF12_Y0;
        let ypy0 = self.y + CPF12_Y0;
        let ypy0q = ypy0 * ypy0;
        let yf = self.y + CPF12_Y0 + CPF12_Y0;
        let mut sum = 0.0;
        for j in 0..6 {
            let dm = x - CPF12_T[j];
            let mq = dm * dm;
            let mf = 1.0 / (mq + ypy0q);
            let dp = x + CPF12_T[j];
            let pq = dp * dp;
            let pf = 1.0 / (pq + ypy0q);
            let (xm, ym) = (mf * dm, mf * ypy0);
            let (xp, yp) = (pf * dp, pf * ypy0);
            sum += (CPF12_C[j] * (mq * mf - CPF12_Y0 * ym) + CPF12_S[j] * yf * xm) / (mq + y0q)
                + (CPF12_C[j] * (pq * pf - CPF12_Y0 * yp) - CPF12_S[j] * yf * xp) / (pq + y0q);
        }
        self.y * sum + (-xq).exp()
    }

    /// Line-shape density [cm] at `dv` cm-1 from line center; integrates to 1.
    pub fn density(&self, dv: f64) -> f64 {
        self.repwid / PI.sqrt() * self.kernel(dv * self.repwid)
    }

    /// Add `sw * density(v_i - nu)` into `out[i]` for every `i` in `window`.
    pub fn accumulate(
        &self,
        grid: &SpectralGrid,
        window: RangeInclusive<usize>,
        nu: f64,
        sw: f64,
        out: &mut [f64],
    ) {
        for i in window {
            out[i] += sw * self.density(grid.wavenumber(i) - nu);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQRT_LN2: f64 = 0.8325546111576977;

    /// Reduced widths covering the Lorentz, W4 and CPF12 regimes plus the degenerate case.
    const YS: [f64; 6] = [1e-7, 0.05, 0.5, 5.0, 50.0, 100.0];

    fn profile_for_y(alpha: f64, y: f64) -> VoigtProfile {
        VoigtProfile::new(alpha, y * alpha / SQRT_LN2)
    }

    #[test]
    fn reduced_width_matches_inputs() {
        let p = VoigtProfile::new(0.05, 0.1);
        assert!((p.y() - 0.1 * SQRT_LN2 / 0.05).abs() < 1e-12);
    }

    #[test]
    fn kernel_is_nonnegative_everywhere() {
        for &y in &[0.0, 1e-7, 1e-3, 0.05, 0.5, 5.0, 50.0, 100.0] {
            let p = profile_for_y(1.0, y);
            for i in 0..100_000 {
                let x = i as f64 * 0.004;
                let k = p.kernel(x);
                assert!(k >= 0.0, "K({x}, {y}) = {k} is negative");
                assert!(k.is_finite());
            }
        }
    }

    #[test]
    fn density_integrates_to_one_in_every_regime() {
        for &y in &YS {
            let alpha = 0.05;
            let p = profile_for_y(alpha, y);
            let gamma = y * alpha / SQRT_LN2;
            let width = alpha.max(gamma);
            let dv = width / 20.0;
            let n = 40_000_i64;
            let total: f64 = (-n..=n).map(|i| p.density(i as f64 * dv)).sum::<f64>() * dv;
            assert!(
                (total - 1.0).abs() < 2e-3,
                "y={y}: integral {total} should be ~1"
            );
        }
    }

    #[test]
    fn regions_selected_by_y() {
        let lorentz = profile_for_y(1.0, 100.0);
        assert_eq!(lorentz.region(0.0), Region::Lorentz);

        let narrow = profile_for_y(1.0, 0.05);
        assert_eq!(narrow.region(0.0), Region::W4Region3);
        assert_eq!(narrow.region(1.0), Region::Cpf12Inner);
        assert_eq!(narrow.region(4.0), Region::Cpf12Outer);
        assert_eq!(narrow.region(10.0), Region::W4Region2);
        assert_eq!(narrow.region(50.0), Region::W4Region1);
        assert_eq!(narrow.region(200.0), Region::Lorentz);

        let wide = profile_for_y(1.0, 10.0);
        assert_eq!(wide.region(0.0), Region::W4Region1);
    }

    #[test]
    fn degenerate_y_skips_w4_regions_one_and_two() {
        let p = profile_for_y(1.0, 1e-7);
        let b = p.bounds();
        assert_eq!(b.xlim1, b.xlim0);
        assert_eq!(b.xlim2, b.xlim0);
        for i in 0..1200 {
            let region = p.region(i as f64 * 0.1);
            assert!(region != Region::W4Region1 && region != Region::W4Region2);
        }
    }

    #[test]
    fn profile_is_continuous_across_region_boundaries() {
        for &y in &[1e-7, 0.05, 0.5, 2.0, 5.0, 10.0, 50.0] {
            let p = profile_for_y(1.0, y);
            let b = p.bounds();
            for limit in [b.xlim0, b.xlim1, b.xlim2, b.xlim3, b.xlim4] {
                if limit <= 0.0 {
                    continue;
                }
                let below = p.kernel(limit * (1.0 - 1e-9));
                let above = p.kernel(limit * (1.0 + 1e-9));
                let rel = (below - above).abs() / below.abs().max(above.abs());
                assert!(
                    rel < 5e-4,
                    "y={y}: jump of {rel} across boundary x={limit}"
                );
            }
        }
    }

    #[test]
    fn pure_lorentz_for_large_y() {
        let alpha = 0.01;
        let gamma = 1.0;
        let p = VoigtProfile::new(alpha, gamma);
        assert!(p.y() >= LORENTZ_ONLY_Y);
        for &dv in &[0.0, 0.3, 2.0, 10.0] {
            let expected = gamma / (PI * (dv * dv + gamma * gamma));
            let got = p.density(dv);
            assert!((got - expected).abs() / expected < 1e-12, "dv={dv}: {got} vs {expected}");
        }
    }

    #[test]
    fn doppler_limit_is_gaussian() {
        let alpha = 0.02;
        let p = VoigtProfile::new(alpha, 0.0);
        for &dv in &[0.0, 0.01, 0.02, 0.04] {
            let x = dv * SQRT_LN2 / alpha;
            let expected = SQRT_LN2 / (alpha * PI.sqrt()) * (-x * x).exp();
            let got = p.density(dv);
            assert!((got - expected).abs() / expected < 1e-3, "dv={dv}: {got} vs {expected}");
        }
    }

    #[test]
    fn accumulate_adds_into_existing_values() {
        let grid = SpectralGrid::new(0, 2, 10).unwrap();
        let p = VoigtProfile::new(0.05, 0.05);
        let mut out = vec![1.0; grid.len()];
        p.accumulate(&grid, 5..=15, 1.0, 2.0, &mut out);
        assert_eq!(out[0], 1.0);
        assert_eq!(out[19], 1.0);
        assert!((out[10] - (1.0 + 2.0 * p.density(0.0))).abs() < 1e-12);
        assert!(out[5] > 1.0 && out[15] > 1.0);
    }
}
