//! Simulation scenario definition
//!
//! A scenario combines a dispersion model with the places and times it is
//! sampled at.

use log::{debug, warn};
use ndarray::{ArrayD, Axis};

use crate::analysis::DataStore;
use crate::config::{ModelKind, ModelParameters};
use crate::error::{ConfigError, StoreError};
use crate::models::{EddyDiffusion, ImageSeries, MonitorLocation, SourceTerm, WellMixed};
use crate::physics::{DispersionModel, SamplePositions, TimeAxis, Volume};

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - Dispersion model (physics and its integrator)
/// - Monitored locations and the lattice they are sampled on
/// - Time axis
/// - Optional near-source exclusion
///
/// # Design
///
/// This is the "WHAT to evaluate". The same model can be sampled at
/// different monitors without being rebuilt.
///
/// # Examples
///
/// ```rust
/// use disperse_rs::analysis::Geometry;
/// use disperse_rs::models::{MonitorLocation, SourceTerm, WellMixed};
/// use disperse_rs::physics::{Direction, TimeAxis, Volume};
/// use disperse_rs::solver::Scenario;
/// use nalgebra::Point3;
///
/// let volume = Volume::new(3.0, 3.0, 3.0);
/// let source = SourceTerm::instantaneous("puff", Point3::new(1.0, 1.0, 1.0), 1.0, 0.0);
///
/// let scenario = Scenario::new(
///     Box::new(WellMixed::new(volume, 0.1, vec![source])),
///     volume,
///     TimeAxis::new(10.0, 5),
///     [4, 4, 4],
///     vec![MonitorLocation::plane("floor", Direction::Z, 0.0)],
/// );
///
/// let store = scenario.evaluate().unwrap();
/// assert_eq!(store.get(Geometry::Plane, "floor").unwrap().shape(), &[5, 4, 4]);
/// ```
pub struct Scenario {
    /// Dispersion model
    pub model: Box<dyn DispersionModel>,

    pub volume: Volume,

    pub time: TimeAxis,

    /// Lattice size along x, y and z
    pub spatial_samples: [usize; 3],

    pub monitors: Vec<MonitorLocation>,

    exclusion: Option<Exclusion>,
}

/// Positions within `radius` of any source are masked with NaN
#[derive(Debug, Clone)]
struct Exclusion {
    radius: f64,
    sources: Vec<SourceTerm>,
}

impl Scenario {
    /// Create a scenario without exclusion
    pub fn new(
        model: Box<dyn DispersionModel>,
        volume: Volume,
        time: TimeAxis,
        spatial_samples: [usize; 3],
        monitors: Vec<MonitorLocation>,
    ) -> Self {
        Self {
            model,
            volume,
            time,
            spatial_samples,
            monitors,
            exclusion: None,
        }
    }

    /// Validate the parameters and build the model and scenario they describe
    pub fn from_parameters(params: &ModelParameters) -> Result<Self, ConfigError> {
        params.validate()?;

        let model: Box<dyn DispersionModel> = match params.model {
            ModelKind::WellMixed => Box::new(WellMixed::new(
                params.volume,
                params.fresh_air_rate,
                params.sources.clone(),
            )),
            ModelKind::EddyDiffusion => Box::new(
                EddyDiffusion::new(
                    params.volume,
                    params.diffusion_coefficient(),
                    params.fresh_air_rate,
                    params.sources.clone(),
                )
                .with_images(ImageSeries::new(params.solver.images))
                .with_integrator(params.solver.integration.integrator()),
            ),
        };

        let scenario = Self::new(
            model,
            params.volume,
            params.time,
            params.spatial_samples,
            params.monitors.clone(),
        );

        Ok(match params.solver.exclusion_radius {
            Some(radius) => scenario.with_exclusion(radius, params.sources.clone()),
            None => scenario,
        })
    }

    /// Mask every sample within `radius` of one of `sources`
    pub fn with_exclusion(mut self, radius: f64, sources: Vec<SourceTerm>) -> Self {
        self.exclusion = Some(Exclusion { radius, sources });
        self
    }

    /// Get model name
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Sample the model at every monitored location
    pub fn evaluate(&self) -> Result<DataStore, StoreError> {
        let mut store = DataStore::new();

        for monitor in &self.monitors {
            let positions = monitor.positions(&self.volume, self.spatial_samples);
            debug!(
                "evaluating {} '{}' at {} points",
                monitor.geometry(),
                monitor.id,
                positions.len()
            );

            let mut grid = self.model.evaluate(&self.time, &positions);
            if let Some(exclusion) = &self.exclusion {
                exclusion.apply(&mut grid, &positions, &monitor.id);
            }
            store.insert(monitor.geometry(), monitor.id.as_str(), grid)?;
        }

        Ok(store)
    }
}

impl Exclusion {
    fn apply(&self, grid: &mut ArrayD<f64>, positions: &SamplePositions, id: &str) {
        let masked: Vec<bool> = positions
            .points()
            .iter()
            .map(|p| self.sources.iter().any(|s| s.distance_to(p) < self.radius))
            .collect();

        if !masked.is_empty() && masked.iter().all(|&m| m) {
            warn!(
                "every point of '{}' lies within {} m of a source and is excluded",
                id, self.radius
            );
        }

        for mut step in grid.axis_iter_mut(Axis(0)) {
            for (value, _) in step.iter_mut().zip(&masked).filter(|(_, m)| **m) {
                *value = f64::NAN;
            }
        }
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("model", &self.model_name())
            .field("volume", &self.volume)
            .field("time", &self.time)
            .field("spatial samples", &self.spatial_samples)
            .field("monitors", &self.monitors.len())
            .field("exclusion radius", &self.exclusion.as_ref().map(|e| e.radius))
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
