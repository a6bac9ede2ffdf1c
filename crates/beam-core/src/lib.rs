//! Angular-spectrum beam propagation.
//!
//! Kernels: propagation, lens phase screens, transverse scan.
//! Facade: [`BeamEngine`] owns the field and sequences every pass.

pub mod engine;
pub mod lens;
pub mod logging;
pub mod propagation;
pub mod snapshot;
pub mod source;
pub mod space;
pub mod transverse;

pub use engine::BeamEngine;
pub use lens::{LensParameters, LensPhaseField, LensProfile};
pub use snapshot::FieldSnapshot;
pub use transverse::{ScanProgress, TransverseScan};
