// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Default grid edge length N (cells).
pub const DEFAULT_GRID_SIZE: usize = 256;

/// Physical extent of the grid (m).
pub const DEFAULT_WIDTH_M: f64 = 2e-4;

/// Gaussian beam waist w0 (m).
pub const DEFAULT_WAIST_M: f64 = 5e-5;

/// Vacuum wavelength (m) - deep red.
pub const DEFAULT_WAVELENGTH_M: f64 = 700e-9;

/// Propagation step Δz (m).
pub const DEFAULT_DELTA_Z_M: f64 = 1e-3;

/// Lens focal length (m).
pub const DEFAULT_FOCAL_LENGTH_M: f64 = 1e-2;

/// Fresnel zones across the grid, per axis.
pub const DEFAULT_ZONE_COUNT: f64 = 11.0;

/// Lateral shift of the reverse zone plate (m).
pub const DEFAULT_LENS_SHIFT_M: f64 = 5e-6;

/// Completed scan steps between progress callbacks.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 8;

/// k-space scale numerator: frequency_scale = K_SCALE_NUMERATOR / width.
/// Grid frequency bins are measured in units of 2/width.
pub const K_SCALE_NUMERATOR: f64 = 2.0;
