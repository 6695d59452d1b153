//! Numerical solver traits and types
//!
//! # Design Philosophy
//!
//! - `ImpulseResponse`: what is integrated (supplied by a physical model)
//! - `TimeIntegrator`: how it is integrated in time (chosen once per run)
//! - `SolverConfiguration`: the numerical choices of a run, validated up front
//! - `SimulationResult`: everything a run produces, plus free-form metadata

use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array2;

use crate::analysis::{DataStore, ResultRecord};
use crate::error::ConfigError;
use crate::models::ImageTruncation;
use crate::solver::methods::{AdaptiveQuadrature, CumulativeTrapezoid};

// =================================================================================================
// Strategy traits
// =================================================================================================

/// Unit-release response of one source at a fixed set of points
///
/// `sample(τ)` returns one value per point; `τ` is the time since release.
/// Implementations must return zeros for `τ ≤ 0`.
pub trait ImpulseResponse: Sync {
    /// Number of points
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Response at every point
    fn sample(&self, tau: f64) -> Vec<f64>;

    /// Response at a single point
    fn sample_point(&self, point: usize, tau: f64) -> f64;
}

/// Converts an impulse response into the response to a unit-rate release
///
/// Given the elapsed time since release at every time sample, returns the
/// running integral `∫₀^elapsed p(τ) dτ` with shape `[time, point]`.
///
/// # Stability Guarantee
///
/// Implementations are stateless and may be shared between threads.
pub trait TimeIntegrator: Send + Sync + fmt::Debug {
    fn integrate(&self, response: &dyn ImpulseResponse, elapsed: &[f64], dt: f64) -> Array2<f64>;

    fn name(&self) -> &str;
}

// =================================================================================================
// Integration method selection
// =================================================================================================

/// Time-integration strategy of a run
///
/// # Examples
///
/// ```rust
/// use disperse_rs::solver::IntegrationMethod;
///
/// let fast = IntegrationMethod::CumulativeTrapezoid;
/// let accurate = IntegrationMethod::adaptive();
///
/// assert_eq!(fast.integrator().name(), "Cumulative Trapezoid");
/// assert_eq!(accurate.integrator().name(), "Adaptive Quadrature");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum IntegrationMethod {
    /// Fixed-step running trapezoid on the time axis
    #[default]
    CumulativeTrapezoid,

    /// Adaptive Simpson per grid point
    ///
    /// # Parameters
    /// - `tolerance`: relative tolerance of every interval integral
    AdaptiveQuadrature { tolerance: f64 },
}

impl IntegrationMethod {
    /// Adaptive quadrature with the default tolerance
    pub fn adaptive() -> Self {
        IntegrationMethod::AdaptiveQuadrature {
            tolerance: AdaptiveQuadrature::default().rel_tol,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            IntegrationMethod::CumulativeTrapezoid => "CumulativeTrapezoid",
            IntegrationMethod::AdaptiveQuadrature { .. } => "AdaptiveQuadrature",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            IntegrationMethod::CumulativeTrapezoid => Ok(()),
            IntegrationMethod::AdaptiveQuadrature { tolerance } => {
                if tolerance > 0.0 && tolerance.is_finite() {
                    Ok(())
                } else {
                    Err(ConfigError::NonPositiveTolerance(tolerance))
                }
            }
        }
    }

    /// Build the strategy object
    pub fn integrator(&self) -> Box<dyn TimeIntegrator> {
        match *self {
            IntegrationMethod::CumulativeTrapezoid => Box::new(CumulativeTrapezoid),
            IntegrationMethod::AdaptiveQuadrature { tolerance } => {
                Box::new(AdaptiveQuadrature::with_tolerance(tolerance))
            }
        }
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Numerical configuration of a run
///
/// # Examples
///
/// ```rust
/// use disperse_rs::models::ImageTruncation;
/// use disperse_rs::solver::{IntegrationMethod, SolverConfiguration};
///
/// let config = SolverConfiguration::default()
///     .with_integration(IntegrationMethod::adaptive())
///     .with_images(ImageTruncation::Manual { pairs: 3 })
///     .with_exclusion_radius(2.0);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolverConfiguration {
    /// Time-integration strategy for continuous sources
    pub integration: IntegrationMethod,

    /// Image-series truncation
    pub images: ImageTruncation,

    /// Mask positions within this distance of any source with NaN
    pub exclusion_radius: Option<f64>,
}

impl SolverConfiguration {
    pub fn with_integration(mut self, integration: IntegrationMethod) -> Self {
        self.integration = integration;
        self
    }

    pub fn with_images(mut self, images: ImageTruncation) -> Self {
        self.images = images;
        self
    }

    pub fn with_exclusion_radius(mut self, radius: f64) -> Self {
        self.exclusion_radius = Some(radius);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.integration.validate()?;

        if let Some(radius) = self.exclusion_radius
            && !(radius >= 0.0)
        {
            return Err(ConfigError::NegativeExclusionRadius(radius));
        }

        Ok(())
    }
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Everything a single run produces
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Sample times \[s\]
    pub times: Vec<f64>,

    /// Concentration grids per monitored location
    pub concentration: DataStore,

    /// Cumulative exposure grids per monitored location
    pub exposure: DataStore,

    /// Derived records for both quantities
    pub records: Vec<ResultRecord>,

    /// Free-form run information (model name, integrator, ...)
    pub metadata: BTreeMap<String, String>,
}

impl SimulationResult {
    pub fn new(
        times: Vec<f64>,
        concentration: DataStore,
        exposure: DataStore,
        records: Vec<ResultRecord>,
    ) -> Self {
        Self {
            times,
            concentration,
            exposure,
            records,
            metadata: BTreeMap::new(),
        }
    }

    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Number of time samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
