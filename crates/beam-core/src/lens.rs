// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Lens Phase Screens
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Thin-lens phase screens applied in position space.
//!
//! Two profiles:
//! - simple: continuous parabola `Φ = (x² + y²)·s/f`
//! - fresnel: periodic blazed zone plate built from [`folded_parabola`],
//!   with an optional reverse plate that is shifted (wrapping) and negated.
//!
//! `s = k/(2·position_scale)` and `f` is the focal length in grid cells.
//! The lens kernel multiplies each cell by `exp(−iΦ)`, so it never changes
//! a cell's magnitude.

use crate::propagation::PropagationParameters;
use beam_types::config::LensConfig;
use beam_types::error::{check_grid_size, check_shape, BeamResult};
use beam_types::state::LensProfileKind;
use ndarray::{Array2, Zip};
use num_complex::Complex64;

/// Which phase screen to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LensProfile {
    Simple,
    /// Zone plate. `reverse` selects the shifted, negated complement.
    Fresnel { reverse: bool },
}

impl LensProfile {
    pub fn kind(self) -> LensProfileKind {
        match self {
            LensProfile::Simple => LensProfileKind::Simple,
            LensProfile::Fresnel { .. } => LensProfileKind::Fresnel,
        }
    }

    /// Screens applied by a full lens stack of the given kind, in order.
    pub fn stack(kind: LensProfileKind) -> &'static [LensProfile] {
        match kind {
            LensProfileKind::Simple => &[LensProfile::Simple],
            LensProfileKind::Fresnel => &[
                LensProfile::Fresnel { reverse: false },
                LensProfile::Fresnel { reverse: true },
            ],
        }
    }
}

/// Lens scalars in grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensParameters {
    /// k/(2·position_scale), rad per cell².
    pub lens_scale: f64,
    /// Focal length in cells.
    pub focal_px: f64,
    /// Zone-plate period along x, cells.
    pub x_period: f64,
    /// Zone-plate period along y, cells.
    pub y_period: f64,
    /// Reverse-plate shift along x, cells.
    pub x_shift: f64,
    /// Reverse-plate shift along y, cells.
    pub y_shift: f64,
}

impl LensParameters {
    pub fn from_config(
        lens: &LensConfig,
        propagation: &PropagationParameters,
        grid_size: usize,
    ) -> BeamResult<Self> {
        check_grid_size(grid_size)?;
        lens.validate()?;
        let n = grid_size as f64;
        let scale = propagation.position_scale;
        Ok(Self {
            lens_scale: propagation.lens_scale(),
            focal_px: lens.focal_length * scale,
            x_period: n / lens.x_count,
            y_period: n / lens.y_count,
            x_shift: lens.x_shift * scale,
            y_shift: lens.y_shift * scale,
        })
    }

    fn coefficient(&self) -> f64 {
        self.lens_scale / self.focal_px
    }
}

/// Parabolic ramp folded into zones of width `period`.
///
/// Inside zone m (centred on m·period) the value is
/// `(u² − (period/2)²)·m·period`, with u the offset from the zone centre.
/// The central zone is flat.
pub fn folded_parabola(x: f64, period: f64) -> f64 {
    let half = period / 2.0;
    let u = (x + half).rem_euclid(period) - half;
    let zone = ((x + half) / period).floor();
    (u * u - half * half) * zone * period
}

/// Wrapped destination index for a shifted write.
fn shifted_index(index: usize, shift: f64, n: usize) -> usize {
    ((index as f64 + shift).rem_euclid(n as f64).floor() as usize) % n
}

/// Real N×N phase grid for one lens profile. Immutable once generated.
#[derive(Debug, Clone)]
pub struct LensPhaseField {
    profile: LensProfile,
    params: LensParameters,
    phase: Array2<f64>,
}

impl LensPhaseField {
    pub fn generate(n: usize, profile: LensProfile, params: LensParameters) -> BeamResult<Self> {
        check_grid_size(n)?;
        let phase = match profile {
            LensProfile::Simple => simple_phase(n, &params),
            LensProfile::Fresnel { reverse: false } => fresnel_phase(n, &params),
            LensProfile::Fresnel { reverse: true } => reverse_fresnel_phase(n, &params),
        };
        tracing::debug!(n, ?profile, focal_px = params.focal_px, "lens phase generated");
        Ok(Self {
            profile,
            params,
            phase,
        })
    }

    pub fn profile(&self) -> LensProfile {
        self.profile
    }

    pub fn params(&self) -> &LensParameters {
        &self.params
    }

    pub fn phase(&self) -> &Array2<f64> {
        &self.phase
    }

    pub fn size(&self) -> usize {
        self.phase.nrows()
    }

    /// True when this screen was generated for exactly these inputs.
    pub fn matches(&self, n: usize, profile: LensProfile, params: &LensParameters) -> bool {
        self.size() == n && self.profile == profile && self.params == *params
    }

    /// Lens kernel: multiply every cell of a position-space field by
    /// `exp(−iΦ)`.
    pub fn apply(&self, field: &mut Array2<Complex64>) -> BeamResult<()> {
        check_shape(self.size(), field.dim())?;
        Zip::from(field)
            .and(&self.phase)
            .par_for_each(|cell, &phi| *cell *= Complex64::cis(-phi));
        Ok(())
    }
}

fn simple_phase(n: usize, params: &LensParameters) -> Array2<f64> {
    let half = (n / 2) as f64;
    let c = params.coefficient();
    Array2::from_shape_fn((n, n), |(row, col)| {
        let x = col as f64 - half;
        let y = row as f64 - half;
        (x * x + y * y) * c
    })
}

fn fresnel_phase(n: usize, params: &LensParameters) -> Array2<f64> {
    let half = (n / 2) as f64;
    let c = params.coefficient();
    Array2::from_shape_fn((n, n), |(row, col)| {
        let x = col as f64 - half;
        let y = row as f64 - half;
        (folded_parabola(x, params.x_period) + folded_parabola(y, params.y_period)) * c
    })
}

fn reverse_fresnel_phase(n: usize, params: &LensParameters) -> Array2<f64> {
    let forward = fresnel_phase(n, params);
    let mut phase = Array2::zeros((n, n));
    for ((row, col), &value) in forward.indexed_iter() {
        let target_row = shifted_index(row, params.y_shift, n);
        let target_col = shifted_index(col, params.x_shift, n);
        phase[[target_row, target_col]] = -value;
    }
    phase
}
