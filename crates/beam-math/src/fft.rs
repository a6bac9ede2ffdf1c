// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — FFT Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Separable in-place 2D radix-2 FFT.
//!
//! Convention matches numpy:
//! - Forward FFT: unnormalized, kernel `exp(−2πi·kn/N)`
//! - Inverse FFT: normalized by 1/N²
//!
//! A transform is one bit-reversal pass, log2(N) butterfly stages along x,
//! log2(N) stages along y, and for the inverse a normalisation pass. Every
//! stage is a separate parallel dispatch over the lanes of the active axis,
//! so stage s+1 always sees the complete output of stage s.

use crate::bit_reverse::BitReversalIndex;
use crate::twiddle::TwiddleFactorTable;
use beam_types::error::{check_grid_size, check_shape, BeamResult};
use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use num_complex::Complex64;

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Position → frequency.
    Forward,
    /// Frequency → position, normalized.
    Inverse,
}

/// Axis a butterfly stage combines along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FftAxis {
    /// Along a row (column index varies).
    X,
    /// Along a column (row index varies).
    Y,
}

impl FftAxis {
    /// Axis to iterate over so that each item is one lane along `self`.
    fn lane_axis(self) -> Axis {
        match self {
            FftAxis::X => Axis(0),
            FftAxis::Y => Axis(1),
        }
    }
}

/// FFT for a fixed N×N grid. Tables are built once and never mutated.
#[derive(Debug, Clone)]
pub struct FftEngine {
    n: usize,
    bit_reversal: BitReversalIndex,
    twiddles: TwiddleFactorTable,
}

impl FftEngine {
    pub fn new(n: usize) -> BeamResult<Self> {
        check_grid_size(n)?;
        Ok(Self {
            n,
            bit_reversal: BitReversalIndex::new(n)?,
            twiddles: TwiddleFactorTable::new(n)?,
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn bit_reversal(&self) -> &BitReversalIndex {
        &self.bit_reversal
    }

    pub fn twiddles(&self) -> &TwiddleFactorTable {
        &self.twiddles
    }

    /// Butterfly control values 2, 4, ..., N.
    pub fn stages(&self) -> impl Iterator<Item = usize> {
        (1..=self.n.ilog2()).map(|s| 1usize << s)
    }

    /// Transform `field` in place. Any N×N buffer is accepted, not only the
    /// canonical beam.
    pub fn transform(&self, field: &mut Array2<Complex64>, direction: Direction) -> BeamResult<()> {
        check_shape(self.n, field.dim())?;
        tracing::trace!(n = self.n, ?direction, "fft");

        self.bit_reversal.apply(field)?;

        for axis in [FftAxis::X, FftAxis::Y] {
            for iteration in self.stages() {
                self.butterfly_stage(field, axis, iteration, direction);
            }
        }

        if direction == Direction::Inverse {
            self.normalize(field);
        }
        Ok(())
    }

    /// Forward 2D FFT, unnormalized.
    pub fn forward(&self, field: &mut Array2<Complex64>) -> BeamResult<()> {
        self.transform(field, Direction::Forward)
    }

    /// Inverse 2D FFT with 1/N² normalization.
    pub fn inverse(&self, field: &mut Array2<Complex64>) -> BeamResult<()> {
        self.transform(field, Direction::Inverse)
    }

    /// One butterfly stage along `axis`.
    ///
    /// Worker p (0 ≤ p < N/2) on each lane combines the even cell `i + j`
    /// with the odd cell `i + j + offset`, where
    /// `i = 2p − (2p mod iteration)`, `j = p mod offset`,
    /// using twiddle `j·N/iteration`. The pairs of one stage are disjoint.
    pub fn butterfly_stage(
        &self,
        field: &mut Array2<Complex64>,
        axis: FftAxis,
        iteration: usize,
        direction: Direction,
    ) {
        debug_assert!(iteration >= 2 && iteration <= self.n && iteration.is_power_of_two());
        let n = self.n;
        let offset = iteration / 2;
        let twiddles = &self.twiddles;

        field
            .axis_iter_mut(axis.lane_axis())
            .into_par_iter()
            .for_each(|mut lane| {
                for p in 0..n / 2 {
                    let i = 2 * p - (2 * p) % iteration;
                    let j = p % offset;
                    let w = twiddles.factor(direction, j * n / iteration);

                    let even_index = i + j;
                    let odd_index = even_index + offset;
                    let even = lane[even_index];
                    let odd = w * lane[odd_index];
                    lane[even_index] = even + odd;
                    lane[odd_index] = even - odd;
                }
            });
    }

    fn normalize(&self, field: &mut Array2<Complex64>) {
        let norm = (self.n * self.n) as f64;
        field.par_mapv_inplace(|c| c / norm);
    }
}
