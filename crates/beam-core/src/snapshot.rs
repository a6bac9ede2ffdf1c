// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Field Snapshot
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Owned, read-only copy of the beam field for display.

use beam_types::state::Domain;
use ndarray::Array2;
use num_complex::Complex64;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSnapshot {
    pub field: Array2<Complex64>,
    /// Domain the copy was taken in.
    pub domain: Domain,
}

impl FieldSnapshot {
    pub fn new(field: Array2<Complex64>, domain: Domain) -> Self {
        Self { field, domain }
    }

    pub fn size(&self) -> usize {
        self.field.nrows()
    }

    /// |ψ|² per cell.
    pub fn intensity(&self) -> Array2<f64> {
        self.field.mapv(|c| c.norm_sqr())
    }

    /// arg ψ per cell, in (−π, π].
    pub fn phase(&self) -> Array2<f64> {
        self.field.mapv(|c| c.arg())
    }

    /// Peak intensity, used for exposure normalisation. Zero for an empty field.
    pub fn max_intensity(&self) -> f64 {
        self.field
            .iter()
            .map(|c| c.norm_sqr())
            .fold(0.0_f64, f64::max)
    }

    /// Σ|ψ|².
    pub fn total_power(&self) -> f64 {
        self.field.iter().map(|c| c.norm_sqr()).sum()
    }
}
