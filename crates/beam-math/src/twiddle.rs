// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Twiddle Factors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Roots of unity for the forward and inverse butterflies.
//!
//! Both tables are flat `f64` buffers of length N. Slot `i` (even) holds
//! `cos θ` and slot `i + 1` holds `sin θ` with `θ = −π·i/N`, so complex
//! factor `m` lives at slots `2m, 2m + 1` and equals `exp(−2πi·m/N)`.
//! The butterfly reads factor `j·N/iteration`, which never exceeds N/2 − 1.

use crate::fft::Direction;
use beam_types::error::{check_grid_size, BeamResult};
use num_complex::Complex64;
use std::f64::consts::PI;

#[derive(Debug, Clone)]
pub struct TwiddleFactorTable {
    n: usize,
    forward: Box<[f64]>,
    inverse: Box<[f64]>,
}

impl TwiddleFactorTable {
    pub fn new(n: usize) -> BeamResult<Self> {
        check_grid_size(n)?;

        let mut forward = vec![0.0; n];
        let mut inverse = vec![0.0; n];
        for i in (0..n).step_by(2) {
            let angle = -PI * i as f64 / n as f64;
            let (sin, cos) = angle.sin_cos();
            forward[i] = cos;
            forward[i + 1] = sin;
            inverse[i] = cos;
            inverse[i + 1] = -sin;
        }

        Ok(Self {
            n,
            forward: forward.into_boxed_slice(),
            inverse: inverse.into_boxed_slice(),
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// Number of complex factors held per direction (N/2).
    pub fn factor_count(&self) -> usize {
        self.n / 2
    }

    /// Raw interleaved table for `direction`.
    pub fn packed(&self, direction: Direction) -> &[f64] {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Inverse => &self.inverse,
        }
    }

    /// Complex factor `m` for `direction`.
    #[inline]
    pub fn factor(&self, direction: Direction, m: usize) -> Complex64 {
        let table = self.packed(direction);
        Complex64::new(table[2 * m], table[2 * m + 1])
    }
}
