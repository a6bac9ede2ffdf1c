// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Angular Spectrum Propagation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Free-space propagation by the angular spectrum method.
//!
//! In k-space every bin is multiplied by `exp(i·k_z·Δz)`. Bins with
//! `k_z² < 0` are evanescent and decay as `exp(−|k_z|·Δz)` instead.
//! All wavenumbers are held in grid units (multiples of the frequency
//! scale), so Δz is rescaled by the same factor before use.

use beam_types::config::BeamConfig;
use beam_types::error::{check_grid_size, check_shape, BeamResult};
use ndarray::{Array2, Zip};
use num_complex::Complex64;

/// Physical scalars derived from the beam config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationParameters {
    /// Free-space wavenumber k (rad/m).
    pub wavenumber: f64,
    /// Grid cells per metre in position space.
    pub position_scale: f64,
    /// Physical wavenumber per frequency bin.
    pub frequency_scale: f64,
}

impl PropagationParameters {
    pub fn from_config(beam: &BeamConfig, grid_size: usize) -> BeamResult<Self> {
        check_grid_size(grid_size)?;
        beam.validate()?;
        Ok(Self {
            wavenumber: beam.wavenumber(),
            position_scale: beam.position_scale(grid_size),
            frequency_scale: beam.frequency_scale(),
        })
    }

    /// k² in frequency-bin units.
    pub fn k_squared_bins(&self) -> f64 {
        let k = self.wavenumber / self.frequency_scale;
        k * k
    }

    /// Lens phase scale k/(2·position_scale), in rad per cell².
    pub fn lens_scale(&self) -> f64 {
        self.wavenumber / (2.0 * self.position_scale)
    }
}

/// Signed frequency of FFT bin `index`: 0, 1, ..., N/2−1, −N/2, ..., −1.
pub fn frequency_bin(index: usize, n: usize) -> f64 {
    let half = n / 2;
    ((index + half) % n) as f64 - half as f64
}

/// Complex multiplier for one bin with longitudinal wavenumber² `kz_squared`
/// over a step `dz` (both in grid units).
#[inline]
pub fn propagation_factor(kz_squared: f64, dz: f64) -> Complex64 {
    if kz_squared >= 0.0 {
        Complex64::cis(kz_squared.sqrt() * dz)
    } else {
        Complex64::new((-(-kz_squared).sqrt() * dz).exp(), 0.0)
    }
}

/// Propagation kernel for a fixed grid and parameter set.
///
/// The k_z² grid is built once; rebuilding the kernel is the only way to
/// change wavelength or width.
#[derive(Debug, Clone)]
pub struct PropagationKernel {
    n: usize,
    params: PropagationParameters,
    kz_squared: Array2<f64>,
}

impl PropagationKernel {
    pub fn new(n: usize, params: PropagationParameters) -> BeamResult<Self> {
        check_grid_size(n)?;
        let k2 = params.k_squared_bins();
        let kz_squared = Array2::from_shape_fn((n, n), |(row, col)| {
            let kx = frequency_bin(col, n);
            let ky = frequency_bin(row, n);
            k2 - kx * kx - ky * ky
        });
        Ok(Self {
            n,
            params,
            kz_squared,
        })
    }

    pub fn params(&self) -> &PropagationParameters {
        &self.params
    }

    /// k_z² per bin, in grid units.
    pub fn kz_squared(&self) -> &Array2<f64> {
        &self.kz_squared
    }

    /// Number of evanescent bins (k_z² < 0).
    pub fn evanescent_count(&self) -> usize {
        self.kz_squared.iter().filter(|&&v| v < 0.0).count()
    }

    /// Advance a k-space field by `delta_z` metres. The caller guarantees the
    /// field is in the frequency domain. Negative steps back-propagate.
    pub fn apply(&self, field: &mut Array2<Complex64>, delta_z: f64) -> BeamResult<()> {
        check_shape(self.n, field.dim())?;
        let dz = delta_z * self.params.frequency_scale;
        tracing::debug!(delta_z, dz_bins = dz, "propagate");

        Zip::from(field)
            .and(&self.kz_squared)
            .par_for_each(|cell, &kz2| *cell *= propagation_factor(kz2, dz));
        Ok(())
    }
}
