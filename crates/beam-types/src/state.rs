// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::BeamError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Representation the beam field is currently held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Spatial amplitude, x-space.
    Position,
    /// Spatial-frequency amplitude, k-space.
    Frequency,
}

impl Domain {
    /// The Fourier-conjugate domain.
    pub fn other(self) -> Self {
        match self {
            Domain::Position => Domain::Frequency,
            Domain::Frequency => Domain::Position,
        }
    }
}

impl Default for Domain {
    fn default() -> Self {
        Domain::Position
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Position => write!(f, "position"),
            Domain::Frequency => write!(f, "frequency"),
        }
    }
}

impl FromStr for Domain {
    type Err = BeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "position" => Ok(Domain::Position),
            "k" | "frequency" => Ok(Domain::Frequency),
            other => Err(BeamError::InvalidArgument(format!(
                "unknown domain: {other:?}"
            ))),
        }
    }
}

/// Plane sampled by a transverse scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPlane {
    /// Midline row (y = N/2), x varies.
    Xz,
    /// Midline column (x = N/2), y varies.
    Yz,
}

impl Default for ScanPlane {
    fn default() -> Self {
        ScanPlane::Xz
    }
}

impl fmt::Display for ScanPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPlane::Xz => write!(f, "xz"),
            ScanPlane::Yz => write!(f, "yz"),
        }
    }
}

impl FromStr for ScanPlane {
    type Err = BeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xz" => Ok(ScanPlane::Xz),
            "yz" => Ok(ScanPlane::Yz),
            other => Err(BeamError::InvalidArgument(format!(
                "unknown scan plane: {other:?}"
            ))),
        }
    }
}

/// Lens phase profile family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensProfileKind {
    /// Continuous parabolic phase.
    Simple,
    /// Periodic blazed zone plate.
    Fresnel,
}

impl Default for LensProfileKind {
    fn default() -> Self {
        LensProfileKind::Simple
    }
}
