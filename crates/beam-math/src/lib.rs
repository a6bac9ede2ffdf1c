//! Mathematical primitives for the beam simulator.

pub mod bit_reverse;
pub mod fft;
pub mod twiddle;

pub use fft::{Direction, FftAxis, FftEngine};
