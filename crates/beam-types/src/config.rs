// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::*;
use crate::error::{check_grid_size, BeamError, BeamResult};
use crate::state::{LensProfileKind, ScanPlane};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::path::Path;

/// Top-level simulation configuration.
/// Every section falls back to defaults so partial JSON files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid edge length N. Must be a power of two.
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default)]
    pub beam: BeamConfig,
    #[serde(default)]
    pub lens: LensConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Physical beam and grid scalars, all SI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamConfig {
    /// Physical grid extent (m)
    #[serde(default = "default_width")]
    pub width: f64,
    /// Gaussian waist w0 (m)
    #[serde(default = "default_waist")]
    pub waist: f64,
    /// Vacuum wavelength (m)
    #[serde(default = "default_wavelength")]
    pub wavelength: f64,
    /// Propagation step Δz (m). May be negative.
    #[serde(default = "default_delta_z")]
    pub delta_z: f64,
}

/// Lens shape parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensConfig {
    #[serde(default)]
    pub profile: LensProfileKind,
    /// Focal length (m)
    #[serde(default = "default_focal_length")]
    pub focal_length: f64,
    /// Zone-plate periods across the grid along x
    #[serde(default = "default_zone_count")]
    pub x_count: f64,
    /// Zone-plate periods across the grid along y
    #[serde(default = "default_zone_count")]
    pub y_count: f64,
    /// Reverse zone-plate shift along x (m)
    #[serde(default = "default_lens_shift")]
    pub x_shift: f64,
    /// Reverse zone-plate shift along y (m)
    #[serde(default = "default_lens_shift")]
    pub y_shift: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub plane: ScanPlane,
    /// Completed steps between progress callbacks (0 = only at the end)
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}
fn default_width() -> f64 {
    DEFAULT_WIDTH_M
}
fn default_waist() -> f64 {
    DEFAULT_WAIST_M
}
fn default_wavelength() -> f64 {
    DEFAULT_WAVELENGTH_M
}
fn default_delta_z() -> f64 {
    DEFAULT_DELTA_Z_M
}
fn default_focal_length() -> f64 {
    DEFAULT_FOCAL_LENGTH_M
}
fn default_zone_count() -> f64 {
    DEFAULT_ZONE_COUNT
}
fn default_lens_shift() -> f64 {
    DEFAULT_LENS_SHIFT_M
}
fn default_progress_interval() -> usize {
    DEFAULT_PROGRESS_INTERVAL
}

impl Default for BeamConfig {
    fn default() -> Self {
        BeamConfig {
            width: default_width(),
            waist: default_waist(),
            wavelength: default_wavelength(),
            delta_z: default_delta_z(),
        }
    }
}

impl Default for LensConfig {
    fn default() -> Self {
        LensConfig {
            profile: LensProfileKind::default(),
            focal_length: default_focal_length(),
            x_count: default_zone_count(),
            y_count: default_zone_count(),
            x_shift: default_lens_shift(),
            y_shift: default_lens_shift(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            plane: ScanPlane::default(),
            progress_interval: default_progress_interval(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            grid_size: default_grid_size(),
            beam: BeamConfig::default(),
            lens: LensConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

fn require_positive(name: &str, value: f64) -> BeamResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(BeamError::ConfigError(format!(
            "{name} must be finite and positive, got {value}"
        )));
    }
    Ok(())
}

fn require_finite(name: &str, value: f64) -> BeamResult<()> {
    if !value.is_finite() {
        return Err(BeamError::ConfigError(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

impl BeamConfig {
    pub fn validate(&self) -> BeamResult<()> {
        require_positive("beam.width", self.width)?;
        require_positive("beam.waist", self.waist)?;
        require_positive("beam.wavelength", self.wavelength)?;
        require_finite("beam.delta_z", self.delta_z)
    }

    /// Free-space wavenumber k = 2π/λ (rad/m).
    pub fn wavenumber(&self) -> f64 {
        TAU / self.wavelength
    }

    /// Position-space scale: grid cells per metre.
    pub fn position_scale(&self, grid_size: usize) -> f64 {
        grid_size as f64 / self.width
    }

    /// k-space scale: physical wavenumber per frequency bin.
    pub fn frequency_scale(&self) -> f64 {
        K_SCALE_NUMERATOR / self.width
    }
}

impl LensConfig {
    pub fn validate(&self) -> BeamResult<()> {
        require_positive("lens.focal_length", self.focal_length)?;
        require_positive("lens.x_count", self.x_count)?;
        require_positive("lens.y_count", self.y_count)?;
        require_finite("lens.x_shift", self.x_shift)?;
        require_finite("lens.y_shift", self.y_shift)
    }
}

impl SimulationConfig {
    /// Validate every section. Called before any engine state is built.
    pub fn validate(&self) -> BeamResult<()> {
        check_grid_size(self.grid_size)?;
        self.beam.validate()?;
        self.lens.validate()
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> BeamResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> BeamResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Same config with a different grid size.
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }
}
