//! Run parameters
//!
//! [`ModelParameters`] is the immutable description of one run. How it is
//! produced (files, ranges expanded into batches, ...) is up to the caller;
//! the crate only requires that it passes [`ModelParameters::validate`].
//!
//! # Example
//!
//! ```rust
//! use disperse_rs::config::{ModelKind, ModelParameters};
//! use disperse_rs::models::{DiffusionSetting, MonitorLocation, SourceTerm};
//! use disperse_rs::physics::{TimeAxis, Volume};
//! use nalgebra::Point3;
//!
//! let params = ModelParameters::new(
//!     ModelKind::EddyDiffusion,
//!     Volume::new(3.0, 3.0, 3.0),
//!     TimeAxis::new(60.0, 30),
//!     DiffusionSetting::Explicit(0.1),
//! )
//! .with_fresh_air_rate(0.05)
//! .with_source(SourceTerm::continuous("leak", Point3::new(1.0, 1.0, 1.0), 1e-4, 0.0))
//! .with_monitor(MonitorLocation::point("desk", Point3::new(2.0, 2.0, 1.0)))
//! .with_concentration_thresholds(vec![1e-5]);
//!
//! assert!(params.validate().is_ok());
//! ```

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::models::{DiffusionCoefficient, DiffusionSetting, Emission, MonitorLocation, SourceTerm};
use crate::physics::{TimeAxis, Volume};
use crate::solver::SolverConfiguration;

/// Default percentage of a spatial location that must exceed a threshold
pub const DEFAULT_PERCENT_TARGET: f64 = 50.0;

/// Default lattice size along each axis
pub const DEFAULT_SPATIAL_SAMPLES: [usize; 3] = [10, 10, 10];

/// Which dispersion model a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    WellMixed,
    EddyDiffusion,
}

/// Thresholds per quantity
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Thresholds {
    /// Concentration thresholds \[kg/m³\]
    pub concentration: Vec<f64>,

    /// Exposure thresholds \[kg·s/m³\]
    pub exposure: Vec<f64>,
}

/// Validated, immutable description of one run
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    pub model: ModelKind,

    pub volume: Volume,

    pub time: TimeAxis,

    /// Lattice size along x, y and z
    pub spatial_samples: [usize; 3],

    /// Fresh-air supply \[m³/s\]
    pub fresh_air_rate: f64,

    pub diffusion: DiffusionSetting,

    pub sources: Vec<SourceTerm>,

    pub monitors: Vec<MonitorLocation>,

    pub solver: SolverConfiguration,

    pub thresholds: Thresholds,

    /// Required percentage for percent-exceedance records
    pub percent_target: f64,
}

impl ModelParameters {
    /// Parameters without sources or monitors, no fresh air and default
    /// numerics
    pub fn new(model: ModelKind, volume: Volume, time: TimeAxis, diffusion: DiffusionSetting) -> Self {
        Self {
            model,
            volume,
            time,
            spatial_samples: DEFAULT_SPATIAL_SAMPLES,
            fresh_air_rate: 0.0,
            diffusion,
            sources: Vec::new(),
            monitors: Vec::new(),
            solver: SolverConfiguration::default(),
            thresholds: Thresholds::default(),
            percent_target: DEFAULT_PERCENT_TARGET,
        }
    }

    pub fn with_spatial_samples(mut self, samples: [usize; 3]) -> Self {
        self.spatial_samples = samples;
        self
    }

    pub fn with_fresh_air_rate(mut self, rate: f64) -> Self {
        self.fresh_air_rate = rate;
        self
    }

    pub fn with_source(mut self, source: SourceTerm) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_monitor(mut self, monitor: MonitorLocation) -> Self {
        self.monitors.push(monitor);
        self
    }

    pub fn with_solver(mut self, solver: SolverConfiguration) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_concentration_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.thresholds.concentration = thresholds;
        self
    }

    pub fn with_exposure_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.thresholds.exposure = thresholds;
        self
    }

    pub fn with_percent_target(mut self, percent: f64) -> Self {
        self.percent_target = percent;
        self
    }

    /// Eddy diffusion coefficient of this run
    pub fn diffusion_coefficient(&self) -> DiffusionCoefficient {
        DiffusionCoefficient::resolve(&self.diffusion, self.fresh_air_rate, self.volume.volume())
    }

    /// Validate every field
    ///
    /// The diffusion setting is only checked for the eddy-diffusion model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = self.volume.dimensions();
        if !dims.iter().all(|&d| d > 0.0 && d.is_finite()) {
            return Err(ConfigError::NonPositiveDimension([dims.x, dims.y, dims.z]));
        }

        if !(self.time.total_time > 0.0 && self.time.total_time.is_finite()) {
            return Err(ConfigError::NonPositiveTime(self.time.total_time));
        }
        if self.time.samples == 0 {
            return Err(ConfigError::NoTimeSamples);
        }
        if self.spatial_samples.contains(&0) {
            return Err(ConfigError::NoSpatialSamples(self.spatial_samples));
        }

        if !(self.fresh_air_rate >= 0.0 && self.fresh_air_rate.is_finite()) {
            return Err(ConfigError::NegativeFreshAir(self.fresh_air_rate));
        }
        if self.model == ModelKind::EddyDiffusion {
            self.diffusion.validate(self.fresh_air_rate)?;
        }

        for source in &self.sources {
            validate_source(source, &self.volume)?;
        }

        let mut seen = HashSet::new();
        for monitor in &self.monitors {
            if !monitor.within(&self.volume) {
                return Err(ConfigError::MonitorOutsideVolume(monitor.id.clone()));
            }
            if !seen.insert((monitor.geometry(), monitor.id.as_str())) {
                return Err(ConfigError::DuplicateMonitor(monitor.id.clone()));
            }
        }

        if !(0.0..=100.0).contains(&self.percent_target) {
            return Err(ConfigError::PercentOutOfRange(self.percent_target));
        }

        self.solver.validate()
    }
}

fn validate_source(source: &SourceTerm, volume: &Volume) -> Result<(), ConfigError> {
    if !volume.contains(&source.position) {
        return Err(ConfigError::SourceOutsideVolume(source.name.clone()));
    }

    let negative = |field: &'static str| ConfigError::NegativeSourceField {
        name: source.name.clone(),
        field,
    };

    match source.emission {
        Emission::Instantaneous { mass, release_time } => {
            if !(mass >= 0.0) {
                return Err(negative("mass"));
            }
            if !(release_time >= 0.0) {
                return Err(negative("release time"));
            }
        }
        Emission::Continuous { rate, release_time } => {
            if !(rate >= 0.0) {
                return Err(negative("rate"));
            }
            if !(release_time >= 0.0) {
                return Err(negative("release time"));
            }
        }
        Emission::FixedDuration {
            rate,
            start_time,
            end_time,
        } => {
            if !(rate >= 0.0) {
                return Err(negative("rate"));
            }
            if !(start_time >= 0.0) {
                return Err(negative("start time"));
            }
            if end_time < start_time {
                return Err(ConfigError::SourceEndsBeforeStart {
                    name: source.name.clone(),
                    start: start_time,
                    end: end_time,
                });
            }
        }
    }
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
