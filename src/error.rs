//! Error types
//!
//! One enum per concern. Numerical NaN/Inf produced by the kernels is data,
//! not an error, and never shows up here.

use thiserror::Error;

use crate::analysis::Geometry;

/// Errors raised by [`DataStore`](crate::analysis::DataStore) insertion and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The grid rank does not match the rank of its geometry class.
    #[error("{geometry} grids must have rank {expected}, got rank {found}")]
    RankMismatch {
        geometry: Geometry,
        expected: usize,
        found: usize,
    },

    /// No grid stored under this geometry class and location id.
    #[error("no {geometry} location named '{id}'")]
    UnknownLocation { geometry: Geometry, id: String },

    /// A grid is already stored under this key.
    #[error("{geometry} location '{id}' is already populated")]
    DuplicateLocation { geometry: Geometry, id: String },
}

/// Errors raised when comparing result records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Records describe different geometry classes.
    #[error("cannot compare a {left} record with a {right} record")]
    GeometryMismatch { left: Geometry, right: Geometry },

    /// Records have different shapes (e.g. Maximum vs Exceedance).
    #[error("cannot compare a {left} record with a {right} record")]
    KindMismatch {
        left: &'static str,
        right: &'static str,
    },
}

/// Validation failures of [`ModelParameters`](crate::config::ModelParameters).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("volume dimensions must be positive, got {0:?}")]
    NonPositiveDimension([f64; 3]),

    #[error("total simulated time must be positive, got {0}")]
    NonPositiveTime(f64),

    #[error("number of time samples must be greater than 0")]
    NoTimeSamples,

    #[error("every axis needs at least one spatial sample, got {0:?}")]
    NoSpatialSamples([usize; 3]),

    #[error("fresh-air rate must be finite and non-negative, got {0}")]
    NegativeFreshAir(f64),

    #[error("explicit diffusion coefficient must be positive, got {0}")]
    NonPositiveDiffusion(f64),

    #[error("diffusion correlation needs at least one vent")]
    NoVents,

    #[error("the diffusion correlation needs a positive fresh-air rate")]
    CorrelationWithoutFreshAir,

    #[error("source '{0}' lies outside the volume")]
    SourceOutsideVolume(String),

    #[error("source '{name}' has a negative {field}")]
    NegativeSourceField { name: String, field: &'static str },

    #[error("source '{name}' ends at {end} before it starts at {start}")]
    SourceEndsBeforeStart { name: String, start: f64, end: f64 },

    #[error("monitor '{0}' lies outside the volume")]
    MonitorOutsideVolume(String),

    #[error("monitor id '{0}' is used more than once")]
    DuplicateMonitor(String),

    #[error("percentage target must lie in [0, 100], got {0}")]
    PercentOutOfRange(f64),

    #[error("quadrature tolerance must be positive, got {0}")]
    NonPositiveTolerance(f64),

    #[error("exclusion radius must be non-negative, got {0}")]
    NegativeExclusionRadius(f64),
}

/// Errors raised by a simulation run or a batch of runs.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid parameters")]
    Config(#[from] ConfigError),

    #[error("result store rejected a grid")]
    Store(#[from] StoreError),

    #[error("could not build the worker pool: {0}")]
    ThreadPool(String),
}
