// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Transverse Scanner
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Side-view (xz / yz) map of the beam over N propagation steps.
//!
//! Each step copies the k-space field into a scratch buffer, inverse
//! transforms the copy, samples the midline into column `step` of the
//! accumulator and then advances the canonical field by Δz. The canonical
//! field stays in the frequency domain for the whole scan.

use crate::propagation::PropagationKernel;
use crate::space::SpaceTracker;
use beam_math::FftEngine;
use beam_types::error::{check_grid_size, BeamResult};
use beam_types::state::{Domain, ScanPlane};
use ndarray::{Array2, ArrayView1, ArrayView2};
use num_complex::Complex64;
use std::ops::ControlFlow;

/// Progress report handed to the scan callback.
#[derive(Debug)]
pub struct ScanProgress<'a> {
    pub plane: ScanPlane,
    /// Steps completed so far.
    pub step: usize,
    pub total: usize,
    /// Accumulator as filled so far; columns ≥ `step` are still zero.
    pub accumulator: ArrayView2<'a, Complex64>,
}

impl ScanProgress<'_> {
    pub fn fraction(&self) -> f64 {
        self.step as f64 / self.total as f64
    }
}

/// Result of one scan.
#[derive(Debug, Clone)]
pub struct TransverseScan {
    pub plane: ScanPlane,
    /// `accumulator[[pos, step]]`, pos along the sampled midline.
    pub accumulator: Array2<Complex64>,
    pub steps_completed: usize,
    pub cancelled: bool,
}

impl TransverseScan {
    pub fn intensity(&self) -> Array2<f64> {
        self.accumulator.mapv(|c| c.norm_sqr())
    }
}

/// Scan driver. Owns its scratch buffer and accumulator so repeated scans
/// do not reallocate.
#[derive(Debug, Clone)]
pub struct TransverseScanner {
    n: usize,
    scratch: Array2<Complex64>,
    accumulator: Array2<Complex64>,
    progress_interval: usize,
}

impl TransverseScanner {
    /// `progress_interval` is the number of completed steps between
    /// callbacks; 0 reports only after the final step.
    pub fn new(n: usize, progress_interval: usize) -> BeamResult<Self> {
        check_grid_size(n)?;
        Ok(Self {
            n,
            scratch: Array2::zeros((n, n)),
            accumulator: Array2::zeros((n, n)),
            progress_interval,
        })
    }

    pub fn progress_interval(&self) -> usize {
        self.progress_interval
    }

    pub fn set_progress_interval(&mut self, interval: usize) {
        self.progress_interval = interval;
    }

    fn reports_at(&self, completed: usize) -> bool {
        completed == self.n
            || (self.progress_interval > 0 && completed % self.progress_interval == 0)
    }

    /// Run a full scan of `plane`, stepping by `delta_z` metres.
    ///
    /// `on_step` returning `ControlFlow::Break` stops the scan before the
    /// next step. Whether finished or cancelled, the canonical field is left
    /// in the frequency domain, propagated by `steps_completed · delta_z`.
    pub fn run<F>(
        &mut self,
        plane: ScanPlane,
        delta_z: f64,
        tracker: &mut SpaceTracker,
        fft: &FftEngine,
        kernel: &PropagationKernel,
        mut on_step: F,
    ) -> BeamResult<TransverseScan>
    where
        F: FnMut(&ScanProgress<'_>) -> ControlFlow<()>,
    {
        let n = self.n;
        let mid = n / 2;
        self.accumulator.fill(Complex64::new(0.0, 0.0));
        tracker.set_space(Domain::Frequency, fft)?;
        tracing::info!(%plane, n, delta_z, "transverse scan started");

        let mut completed = 0;
        let mut cancelled = false;
        for step in 0..n {
            self.scratch.assign(tracker.field());
            fft.inverse(&mut self.scratch)?;

            let line: ArrayView1<'_, Complex64> = match plane {
                ScanPlane::Xz => self.scratch.row(mid),
                ScanPlane::Yz => self.scratch.column(mid),
            };
            self.accumulator.column_mut(step).assign(&line);

            kernel.apply(tracker.require(Domain::Frequency, fft)?, delta_z)?;
            completed = step + 1;

            if self.reports_at(completed) {
                let progress = ScanProgress {
                    plane,
                    step: completed,
                    total: n,
                    accumulator: self.accumulator.view(),
                };
                if on_step(&progress).is_break() && completed < n {
                    cancelled = true;
                    break;
                }
            }
        }

        if cancelled {
            tracing::warn!(%plane, completed, total = n, "transverse scan cancelled");
        } else {
            tracing::info!(%plane, completed, "transverse scan finished");
        }

        Ok(TransverseScan {
            plane,
            accumulator: self.accumulator.clone(),
            steps_completed: completed,
            cancelled,
        })
    }
}
