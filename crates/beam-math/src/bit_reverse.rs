// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Bit-Reversal Permutation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Input reordering for the decimation-in-time FFT.
//!
//! Both axes are reordered in one pass: the row and column parts of the
//! linear index are bit-reversed independently and recombined. The
//! permutation is an involution, so applying it twice restores the input.

use beam_types::error::{check_grid_size, check_shape, BeamResult};
use ndarray::{Array2, Zip};
use num_complex::Complex64;

/// Reverse the low `bits` bits of `value`.
pub fn reverse_bits(value: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    value.reverse_bits() >> (usize::BITS - bits)
}

/// Precomputed permutation over the N² linear indices of an N×N grid.
#[derive(Debug, Clone)]
pub struct BitReversalIndex {
    n: usize,
    targets: Box<[usize]>,
}

impl BitReversalIndex {
    pub fn new(n: usize) -> BeamResult<Self> {
        check_grid_size(n)?;
        let bits = n.ilog2();

        let mut targets = Vec::with_capacity(n * n);
        for row in 0..n {
            let rev_row = reverse_bits(row, bits);
            for col in 0..n {
                targets.push(rev_row * n + reverse_bits(col, bits));
            }
        }

        Ok(Self {
            n,
            targets: targets.into_boxed_slice(),
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// Target linear index of linear index `i`.
    pub fn target(&self, i: usize) -> usize {
        self.targets[i]
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Reorder `field` in place.
    ///
    /// One parallel pass: every cell gathers the value at its target from a
    /// copy of the input. The permutation is an involution, so this is the
    /// same as swapping each 2-cycle exactly once.
    pub fn apply(&self, field: &mut Array2<Complex64>) -> BeamResult<()> {
        check_shape(self.n, field.dim())?;
        let n = self.n;
        let source = field.to_owned();
        let targets = &self.targets;

        Zip::indexed(field).par_for_each(|(row, col), cell| {
            let j = targets[row * n + col];
            *cell = source[(j / n, j % n)];
        });
        Ok(())
    }
}
