// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Space Tracker
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Position ⇄ frequency state machine for the canonical beam field.
//!
//! The tracker owns the field together with the domain it is held in.
//! Mutable access is only handed out through [`SpaceTracker::require`],
//! which first moves the field into the requested domain, so the recorded
//! domain cannot drift from the field's real representation.

use beam_math::{Direction, FftEngine};
use beam_types::error::{check_shape, BeamResult};
use beam_types::state::Domain;
use ndarray::Array2;
use num_complex::Complex64;

#[derive(Debug, Clone)]
pub struct SpaceTracker {
    field: Array2<Complex64>,
    domain: Domain,
    transforms: usize,
}

impl SpaceTracker {
    /// Track `field`, which is declared to be in `domain`.
    pub fn new(field: Array2<Complex64>, domain: Domain) -> Self {
        Self {
            field,
            domain,
            transforms: 0,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Read-only view of the field in whatever domain it currently is.
    pub fn field(&self) -> &Array2<Complex64> {
        &self.field
    }

    /// Number of FFTs run by this tracker since construction.
    pub fn transform_count(&self) -> usize {
        self.transforms
    }

    /// Replace the field wholesale with data already in `domain`.
    pub fn load(&mut self, field: Array2<Complex64>, domain: Domain) -> BeamResult<()> {
        check_shape(self.field.nrows(), field.dim())?;
        self.field = field;
        self.domain = domain;
        tracing::debug!(%domain, "field loaded");
        Ok(())
    }

    /// Move the field into `target`. No-op when already there.
    ///
    /// Returns whether a transform ran.
    pub fn set_space(&mut self, target: Domain, fft: &FftEngine) -> BeamResult<bool> {
        if target == self.domain {
            return Ok(false);
        }

        let direction = match target {
            Domain::Position => Direction::Inverse,
            Domain::Frequency => Direction::Forward,
        };
        fft.transform(&mut self.field, direction)?;

        tracing::debug!(from = %self.domain, to = %target, "domain transition");
        self.domain = target;
        self.transforms += 1;
        Ok(true)
    }

    /// Mutable field access, guaranteed to be in `domain`.
    pub fn require(
        &mut self,
        domain: Domain,
        fft: &FftEngine,
    ) -> BeamResult<&mut Array2<Complex64>> {
        self.set_space(domain, fft)?;
        Ok(&mut self.field)
    }
}
