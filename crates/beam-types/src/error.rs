// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BeamError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Grid shape mismatch: expected {expected}x{expected}, got {rows}x{cols}")]
    GridMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type BeamResult<T> = Result<T, BeamError>;

/// Reject any grid size the radix-2 transform cannot handle.
pub fn check_grid_size(n: usize) -> BeamResult<()> {
    if n < 2 || !n.is_power_of_two() {
        return Err(BeamError::ConfigError(format!(
            "grid size must be a power of two >= 2, got {n}"
        )));
    }
    Ok(())
}

/// Check that a buffer has the square N×N shape an engine was built for.
pub fn check_shape(expected: usize, dim: (usize, usize)) -> BeamResult<()> {
    let (rows, cols) = dim;
    if rows != expected || cols != expected {
        return Err(BeamError::GridMismatch {
            expected,
            rows,
            cols,
        });
    }
    Ok(())
}
