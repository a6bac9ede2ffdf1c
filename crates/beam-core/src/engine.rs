// ─────────────────────────────────────────────────────────────────────
// Beam Propagation — Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! BeamEngine: one live beam field and every operation on it.
//!
//! The engine owns the canonical field (through [`SpaceTracker`]), the FFT
//! tables, the propagation kernel, a small cache of lens phase screens and
//! the transverse scanner. All operations take `&mut self`, so passes on
//! the field are strictly sequential.

use crate::lens::{LensParameters, LensPhaseField, LensProfile};
use crate::propagation::{PropagationKernel, PropagationParameters};
use crate::snapshot::FieldSnapshot;
use crate::source::gaussian_from_config;
use crate::space::SpaceTracker;
use crate::transverse::{ScanProgress, TransverseScan, TransverseScanner};
use beam_math::FftEngine;
use beam_types::config::{LensConfig, SimulationConfig};
use beam_types::error::{BeamError, BeamResult};
use beam_types::state::{Domain, LensProfileKind, ScanPlane};
use ndarray::Array2;
use num_complex::Complex64;
use std::ops::ControlFlow;
use std::path::Path;

/// A fresnel stack needs two screens (forward and reverse).
const LENS_CACHE_SLOTS: usize = 2;

pub struct BeamEngine {
    config: SimulationConfig,
    fft: FftEngine,
    tracker: SpaceTracker,
    propagation: PropagationKernel,
    lenses: Vec<LensPhaseField>,
    scanner: TransverseScanner,
}

impl BeamEngine {
    /// Validate `config`, build tables and kernels, and load the Gaussian
    /// source in the position domain. No lens is applied; see [`reset`].
    ///
    /// [`reset`]: BeamEngine::reset
    #[tracing::instrument(skip_all, fields(grid_size = config.grid_size))]
    pub fn initialize(config: SimulationConfig) -> BeamResult<Self> {
        config.validate()?;
        let n = config.grid_size;
        let fft = FftEngine::new(n)?;
        let params = PropagationParameters::from_config(&config.beam, n)?;
        let propagation = PropagationKernel::new(n, params)?;
        let scanner = TransverseScanner::new(n, config.scan.progress_interval)?;
        let tracker = SpaceTracker::new(gaussian_from_config(&config), Domain::Position);

        tracing::info!(
            n,
            wavelength = config.beam.wavelength,
            width = config.beam.width,
            evanescent_bins = propagation.evanescent_count(),
            threads = rayon::current_num_threads(),
            "beam engine initialised"
        );
        Ok(Self {
            config,
            fft,
            tracker,
            propagation,
            lenses: Vec::with_capacity(LENS_CACHE_SLOTS),
            scanner,
        })
    }

    pub fn new(config: SimulationConfig) -> BeamResult<Self> {
        Self::initialize(config)
    }

    /// Build an engine from a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> BeamResult<Self> {
        Self::initialize(SimulationConfig::from_file(path)?)
    }

    /// Move the field to `target`. Returns whether a transform ran.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn set_domain(&mut self, target: Domain) -> BeamResult<bool> {
        self.tracker.set_space(target, &self.fft)
    }

    /// Advance the field by `delta_z` metres (negative for back-propagation).
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn propagate(&mut self, delta_z: f64) -> BeamResult<()> {
        let field = self.tracker.require(Domain::Frequency, &self.fft)?;
        self.propagation.apply(field, delta_z)
    }

    /// Multiply the field by one lens phase screen. The screen is regenerated
    /// only when `profile` or the lens parameters changed.
    ///
    /// `profile` must belong to the stack named by `lens.profile`.
    #[tracing::instrument(level = "debug", skip(self, lens))]
    pub fn apply_lens(&mut self, profile: LensProfile, lens: &LensConfig) -> BeamResult<()> {
        if profile.kind() != lens.profile {
            return Err(BeamError::InvalidArgument(format!(
                "lens profile {:?} does not match configured {:?} stack",
                profile, lens.profile
            )));
        }
        let n = self.config.grid_size;
        let params = LensParameters::from_config(lens, self.propagation.params(), n)?;
        let slot = self.lens_slot(n, profile, params)?;
        let field = self.tracker.require(Domain::Position, &self.fft)?;
        self.lenses[slot].apply(field)
    }

    fn lens_slot(
        &mut self,
        n: usize,
        profile: LensProfile,
        params: LensParameters,
    ) -> BeamResult<usize> {
        if let Some(slot) = self.lenses.iter().position(|l| l.matches(n, profile, &params)) {
            return Ok(slot);
        }
        let lens = LensPhaseField::generate(n, profile, params)?;
        if self.lenses.len() >= LENS_CACHE_SLOTS {
            self.lenses.remove(0);
        }
        self.lenses.push(lens);
        Ok(self.lenses.len() - 1)
    }

    /// Scan `plane` over N steps of the configured Δz.
    ///
    /// Afterwards the field is in the frequency domain, advanced by
    /// `steps_completed · Δz`.
    #[tracing::instrument(skip(self, on_step))]
    pub fn run_transverse_scan<F>(
        &mut self,
        plane: ScanPlane,
        on_step: F,
    ) -> BeamResult<TransverseScan>
    where
        F: FnMut(&ScanProgress<'_>) -> ControlFlow<()>,
    {
        let delta_z = self.config.beam.delta_z;
        self.scanner.run(
            plane,
            delta_z,
            &mut self.tracker,
            &self.fft,
            &self.propagation,
            on_step,
        )
    }

    /// Scan the plane named in the configuration.
    pub fn run_configured_scan<F>(&mut self, on_step: F) -> BeamResult<TransverseScan>
    where
        F: FnMut(&ScanProgress<'_>) -> ControlFlow<()>,
    {
        let plane = self.config.scan.plane;
        self.run_transverse_scan(plane, on_step)
    }

    /// Owned position-space copy of the field for display.
    pub fn snapshot(&mut self) -> BeamResult<FieldSnapshot> {
        self.tracker.set_space(Domain::Position, &self.fft)?;
        Ok(FieldSnapshot::new(self.tracker.field().clone(), Domain::Position))
    }

    /// Fresh Gaussian followed by the configured lens stack: one simple
    /// screen, or a forward zone plate then its reverse.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) -> BeamResult<()> {
        self.tracker
            .load(gaussian_from_config(&self.config), Domain::Position)?;
        let lens = self.config.lens.clone();
        for &profile in LensProfile::stack(lens.profile) {
            self.apply_lens(profile, &lens)?;
        }
        Ok(())
    }

    /// Propagate `count` steps of Δz, reporting after each one.
    ///
    /// `on_step` receives the number of steps done and may stop early.
    /// Returns the number of steps taken.
    #[tracing::instrument(level = "debug", skip(self, on_step))]
    pub fn propagate_steps<F>(&mut self, count: usize, mut on_step: F) -> BeamResult<usize>
    where
        F: FnMut(usize) -> ControlFlow<()>,
    {
        let delta_z = self.config.beam.delta_z;
        for step in 1..=count {
            self.propagate(delta_z)?;
            if on_step(step).is_break() {
                return Ok(step);
            }
        }
        Ok(count)
    }

    /// Reset, then a single propagation by `multiple · Δz`.
    pub fn propagate_from_reset(&mut self, multiple: f64) -> BeamResult<()> {
        self.reset()?;
        self.propagate(multiple * self.config.beam.delta_z)
    }

    /// Replace the configuration.
    ///
    /// Everything derived is rebuilt before any state changes, so an error
    /// leaves the engine untouched. A new grid size, beam geometry or lens
    /// stack runs [`reset`]; a new wavelength or step keeps the field.
    ///
    /// [`reset`]: BeamEngine::reset
    #[tracing::instrument(skip_all, fields(grid_size = config.grid_size))]
    pub fn update_config(&mut self, config: SimulationConfig) -> BeamResult<()> {
        config.validate()?;
        let n = config.grid_size;
        let params = PropagationParameters::from_config(&config.beam, n)?;
        LensParameters::from_config(&config.lens, &params, n)?;

        let resized = n != self.config.grid_size;
        let reshaped = config.beam.width != self.config.beam.width
            || config.beam.waist != self.config.beam.waist;
        let relensed = lens_stack_changed(&self.config.lens, &config.lens);

        if resized {
            let fft = FftEngine::new(n)?;
            let scanner = TransverseScanner::new(n, config.scan.progress_interval)?;
            let propagation = PropagationKernel::new(n, params)?;
            self.tracker = SpaceTracker::new(gaussian_from_config(&config), Domain::Position);
            self.fft = fft;
            self.scanner = scanner;
            self.propagation = propagation;
            self.lenses.clear();
        } else {
            if params != *self.propagation.params() {
                self.propagation = PropagationKernel::new(n, params)?;
            }
            self.scanner
                .set_progress_interval(config.scan.progress_interval);
        }

        tracing::info!(n, resized, reshaped, relensed, "configuration updated");
        self.config = config;
        if resized || reshaped || relensed {
            self.reset()?;
        }
        Ok(())
    }

    /// Replace the field with caller data already in `domain`.
    pub fn load_field(&mut self, field: Array2<Complex64>, domain: Domain) -> BeamResult<()> {
        self.tracker.load(field, domain)
    }

    pub fn domain(&self) -> Domain {
        self.tracker.domain()
    }

    pub fn grid_size(&self) -> usize {
        self.config.grid_size
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The field in its current domain.
    pub fn field(&self) -> &Array2<Complex64> {
        self.tracker.field()
    }

    /// FFTs run on the canonical field since it was last rebuilt. Scan
    /// scratch transforms are not counted.
    pub fn transform_count(&self) -> usize {
        self.tracker.transform_count()
    }

    pub fn propagation_parameters(&self) -> &PropagationParameters {
        self.propagation.params()
    }
}

/// Whether moving from `old` to `new` changes the screens a reset applies.
/// Zone counts and shifts only shape the fresnel stack.
fn lens_stack_changed(old: &LensConfig, new: &LensConfig) -> bool {
    if old.profile != new.profile || old.focal_length != new.focal_length {
        return true;
    }
    new.profile == LensProfileKind::Fresnel
        && (old.x_count != new.x_count
            || old.y_count != new.y_count
            || old.x_shift != new.x_shift
            || old.y_shift != new.y_shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beam_types::config::BeamConfig;

    fn spreading_config() -> SimulationConfig {
        SimulationConfig {
            grid_size: 64,
            beam: BeamConfig {
                width: 2e-4,
                waist: 1e-5,
                wavelength: 700e-9,
                delta_z: 1e-3,
            },
            ..SimulationConfig::default()
        }
    }

    fn power(field: &Array2<Complex64>) -> f64 {
        field.iter().map(|c| c.norm_sqr()).sum()
    }

    #[test]
    fn test_initialize_loads_gaussian_in_position() {
        let engine = BeamEngine::initialize(spreading_config()).unwrap();
        assert_eq!(engine.domain(), Domain::Position);
        assert_eq!(engine.grid_size(), 64);
        assert_eq!(engine.transform_count(), 0);
        assert!((engine.field()[[32, 32]].re - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig::default().with_grid_size(96);
        assert!(matches!(
            BeamEngine::initialize(config),
            Err(BeamError::ConfigError(_))
        ));
    }

    #[test]
    fn test_set_domain_transforms_once() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        assert!(engine.set_domain(Domain::Frequency).unwrap());
        assert!(!engine.set_domain(Domain::Frequency).unwrap());
        assert_eq!(engine.transform_count(), 1);
    }

    #[test]
    fn test_impulse_spectrum_is_flat() {
        let config = SimulationConfig::default().with_grid_size(8);
        let mut engine = BeamEngine::initialize(config).unwrap();
        let mut impulse = Array2::zeros((8, 8));
        impulse[[4, 4]] = Complex64::new(1.0, 0.0);
        engine.load_field(impulse, Domain::Position).unwrap();

        engine.set_domain(Domain::Frequency).unwrap();
        for v in engine.field().iter() {
            assert!((v.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_propagation_is_identity() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        let before = engine.snapshot().unwrap();
        engine.propagate(0.0).unwrap();
        let after = engine.snapshot().unwrap();
        for (a, b) in after.field.iter().zip(before.field.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn test_back_propagation_restores_field() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        let before = engine.snapshot().unwrap();
        engine.propagate(5e-3).unwrap();
        engine.propagate(-5e-3).unwrap();
        let after = engine.snapshot().unwrap();
        for (a, b) in after.field.iter().zip(before.field.iter()) {
            assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn test_gaussian_peak_falls_with_distance() {
        let mut peaks = Vec::new();
        for dz in [0.002, 0.004, 0.008, 0.016] {
            let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
            engine.propagate(dz).unwrap();
            peaks.push(engine.snapshot().unwrap().max_intensity());
        }
        assert!(peaks[0] < 1.0);
        for pair in peaks.windows(2) {
            assert!(pair[1] < pair[0], "peaks not decreasing: {peaks:?}");
        }
    }

    #[test]
    fn test_propagation_conserves_power() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        let p0 = power(engine.field());
        engine.propagate(4e-3).unwrap();
        let p1 = engine.snapshot().unwrap().total_power();
        assert!((p1 - p0).abs() < 1e-9 * p0);
    }

    #[test]
    fn test_lens_conserves_power_and_requires_position() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        let before = engine.snapshot().unwrap();
        engine.set_domain(Domain::Frequency).unwrap();

        let lens = engine.config().lens.clone();
        engine.apply_lens(LensProfile::Simple, &lens).unwrap();
        assert_eq!(engine.domain(), Domain::Position);
        assert_eq!(engine.transform_count(), 2);
        for (a, b) in engine.field().iter().zip(before.field.iter()) {
            assert!((a.norm() - b.norm()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_lens_profile_must_match_config() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        let before = engine.field().clone();
        let mut lens = engine.config().lens.clone();
        lens.profile = LensProfileKind::Fresnel;

        assert!(matches!(
            engine.apply_lens(LensProfile::Simple, &lens),
            Err(BeamError::InvalidArgument(_))
        ));
        assert_eq!(engine.field(), &before);
        assert!(engine.lenses.is_empty());

        lens.profile = LensProfileKind::Simple;
        assert!(matches!(
            engine.apply_lens(LensProfile::Fresnel { reverse: true }, &lens),
            Err(BeamError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_lens_cache_reused() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        let mut lens = engine.config().lens.clone();
        lens.profile = LensProfileKind::Fresnel;
        for _ in 0..3 {
            engine.apply_lens(LensProfile::Fresnel { reverse: false }, &lens).unwrap();
            engine.apply_lens(LensProfile::Fresnel { reverse: true }, &lens).unwrap();
        }
        assert_eq!(engine.lenses.len(), 2);

        lens.focal_length *= 2.0;
        lens.profile = LensProfileKind::Simple;
        engine.apply_lens(LensProfile::Simple, &lens).unwrap();
        assert_eq!(engine.lenses.len(), 2);
        assert_eq!(engine.lenses[1].profile(), LensProfile::Simple);
    }

    #[test]
    fn test_reset_applies_lens_stack() {
        let mut config = spreading_config();
        config.lens.profile = LensProfileKind::Fresnel;
        let mut engine = BeamEngine::initialize(config).unwrap();
        engine.propagate(1e-3).unwrap();
        engine.reset().unwrap();

        assert_eq!(engine.domain(), Domain::Position);
        // Lens screens only change phase.
        let gaussian = gaussian_from_config(engine.config());
        for (a, b) in engine.field().iter().zip(gaussian.iter()) {
            assert!((a.norm() - b.norm()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scan_then_snapshot() {
        let mut config = spreading_config();
        config.grid_size = 32;
        config.scan.progress_interval = 4;
        let mut engine = BeamEngine::initialize(config).unwrap();
        let mut reports = 0;
        let scan = engine
            .run_transverse_scan(ScanPlane::Yz, |_| {
                reports += 1;
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(reports, 8);
        assert_eq!(scan.steps_completed, 32);
        assert_eq!(scan.accumulator.dim(), (32, 32));
        assert_eq!(engine.domain(), Domain::Frequency);

        let snap = engine.snapshot().unwrap();
        assert_eq!(snap.domain, Domain::Position);
        assert_eq!(engine.domain(), Domain::Position);
    }

    #[test]
    fn test_configured_scan_uses_config_plane() {
        let mut config = spreading_config();
        config.grid_size = 16;
        config.scan.plane = ScanPlane::Yz;
        let mut engine = BeamEngine::initialize(config.clone()).unwrap();
        let scan = engine
            .run_configured_scan(|_| ControlFlow::Continue(()))
            .unwrap();
        assert_eq!(scan.plane, ScanPlane::Yz);

        let mut reference = BeamEngine::initialize(config).unwrap();
        let expected = reference
            .run_transverse_scan(ScanPlane::Yz, |_| ControlFlow::Continue(()))
            .unwrap();
        assert_eq!(scan.accumulator, expected.accumulator);
    }

    #[test]
    fn test_propagate_steps_stops_early() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        let taken = engine
            .propagate_steps(10, |step| {
                if step == 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(taken, 3);

        let mut reference = BeamEngine::initialize(spreading_config()).unwrap();
        reference.propagate(3e-3).unwrap();
        for (a, b) in engine.field().iter().zip(reference.field().iter()) {
            assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn test_propagate_from_reset_is_repeatable() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        engine.propagate_from_reset(2.0).unwrap();
        let first = engine.snapshot().unwrap();
        engine.propagate_from_reset(2.0).unwrap();
        let second = engine.snapshot().unwrap();
        for (a, b) in first.field.iter().zip(second.field.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn test_update_config_resize() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        engine.propagate(1e-3).unwrap();
        engine.update_config(spreading_config().with_grid_size(32)).unwrap();
        assert_eq!(engine.grid_size(), 32);
        assert_eq!(engine.field().dim(), (32, 32));
        assert_eq!(engine.domain(), Domain::Position);
        engine.propagate(1e-3).unwrap();
    }

    fn assert_matches_fresh_reset(engine: &BeamEngine, config: SimulationConfig) {
        let mut fresh = BeamEngine::initialize(config).unwrap();
        fresh.reset().unwrap();
        assert_eq!(engine.domain(), fresh.domain());
        for (a, b) in engine.field().iter().zip(fresh.field().iter()) {
            assert!((a - b).norm() < 1e-12, "{a} vs {b}");
        }
    }

    #[test]
    fn test_update_config_focal_length_reapplies_lens() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        engine.reset().unwrap();
        engine.propagate(1e-3).unwrap();

        let mut config = spreading_config();
        config.lens.focal_length *= 3.0;
        engine.update_config(config.clone()).unwrap();
        assert_matches_fresh_reset(&engine, config);
    }

    #[test]
    fn test_update_config_width_reapplies_lens() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        engine.reset().unwrap();

        let mut config = spreading_config();
        config.beam.width *= 2.0;
        engine.update_config(config.clone()).unwrap();
        assert_matches_fresh_reset(&engine, config);
    }

    #[test]
    fn test_update_config_fresnel_shift_reapplies_lens() {
        let mut config = spreading_config();
        config.lens.profile = LensProfileKind::Fresnel;
        let mut engine = BeamEngine::initialize(config.clone()).unwrap();
        engine.reset().unwrap();
        engine.propagate(1e-3).unwrap();

        config.lens.x_shift *= -2.0;
        engine.update_config(config.clone()).unwrap();
        assert_matches_fresh_reset(&engine, config);
    }

    #[test]
    fn test_update_config_resize_reapplies_lens() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        let config = spreading_config().with_grid_size(32);
        engine.update_config(config.clone()).unwrap();
        assert_matches_fresh_reset(&engine, config);
    }

    #[test]
    fn test_update_config_simple_zone_count_keeps_field() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        engine.propagate(1e-3).unwrap();
        let field = engine.field().clone();

        let mut config = spreading_config();
        config.lens.x_count += 4.0;
        engine.update_config(config).unwrap();
        assert_eq!(engine.field(), &field);
        assert_eq!(engine.domain(), Domain::Frequency);
    }

    #[test]
    fn test_update_config_wavelength_keeps_field() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        engine.propagate(1e-3).unwrap();
        let field = engine.field().clone();

        let mut config = spreading_config();
        config.beam.wavelength = 532e-9;
        engine.update_config(config).unwrap();
        assert_eq!(engine.field(), &field);
        assert_eq!(engine.domain(), Domain::Frequency);
        let k = engine.propagation_parameters().wavenumber;
        assert!((k - std::f64::consts::TAU / 532e-9).abs() < 1e-3);
    }

    #[test]
    fn test_update_config_rejects_and_keeps_state() {
        let mut engine = BeamEngine::initialize(spreading_config()).unwrap();
        let mut bad = spreading_config();
        bad.beam.wavelength = -1.0;
        assert!(engine.update_config(bad).is_err());
        assert_eq!(engine.config(), &spreading_config());
    }
}
