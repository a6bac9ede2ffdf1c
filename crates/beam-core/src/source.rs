// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Beam Sources
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Initial beam profiles.

use beam_types::config::SimulationConfig;
use ndarray::Array2;
use num_complex::Complex64;

/// Real Gaussian amplitude `exp(−(x² + y²)/w²)` centred on the grid.
///
/// `waist_px` is the 1/e amplitude radius in grid cells. Cell (N/2, N/2)
/// carries the peak amplitude 1.
pub fn gaussian_beam(n: usize, waist_px: f64) -> Array2<Complex64> {
    let half = (n / 2) as f64;
    let w2 = waist_px * waist_px;
    Array2::from_shape_fn((n, n), |(row, col)| {
        let x = col as f64 - half;
        let y = row as f64 - half;
        Complex64::new((-(x * x + y * y) / w2).exp(), 0.0)
    })
}

/// Gaussian beam for the configured grid, waist and physical width.
pub fn gaussian_from_config(config: &SimulationConfig) -> Array2<Complex64> {
    let waist_px = config.beam.waist * config.beam.position_scale(config.grid_size);
    gaussian_beam(config.grid_size, waist_px)
}
