//! Numerical evaluation
//!
//! This module decides **how** the dispersion models are evaluated: which
//! time integrator turns an impulse response into a continuous release,
//! where the models are sampled, and how runs are dispatched.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to evaluate
//!    - Dispersion model (physics)
//!    - Monitored locations and the sampling lattice
//!    - Time axis and near-source exclusion
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to evaluate
//!    - Time integration (`IntegrationMethod`)
//!    - Image-series truncation
//!    - Exclusion radius
//!
//! 3. **Integrator** (`TimeIntegrator` trait) - The numerical method
//!    - Integrates an impulse response over elapsed time
//!    - Chosen once per run
//!    - Independent of physics
//!
//! # Module Organization
//!
//! - **`traits`**: `ImpulseResponse`, `TimeIntegrator`, `IntegrationMethod`,
//!   `SolverConfiguration`, `SimulationResult`
//! - **`methods`**: `CumulativeTrapezoid` and `AdaptiveQuadrature`
//! - **`scenario`**: `Scenario`, model + monitors + time axis
//! - **`runner`**: `run` for one parameter set, `run_batch` for many
//!
//! # Quick Start Example
//!
//! ```rust
//! use disperse_rs::analysis::Geometry;
//! use disperse_rs::config::{ModelKind, ModelParameters};
//! use disperse_rs::models::{DiffusionSetting, MonitorLocation, SourceTerm};
//! use disperse_rs::physics::{TimeAxis, Volume};
//! use disperse_rs::solver::{run, IntegrationMethod, SolverConfiguration};
//! use nalgebra::Point3;
//!
//! // 1. Describe the run (WHAT)
//! let params = ModelParameters::new(
//!     ModelKind::EddyDiffusion,
//!     Volume::new(3.0, 3.0, 3.0),
//!     TimeAxis::new(60.0, 30),
//!     DiffusionSetting::Explicit(0.05),
//! )
//! .with_source(SourceTerm::instantaneous("spill", Point3::new(1.5, 1.5, 1.0), 1e-3, 0.0))
//! .with_monitor(MonitorLocation::point("desk", Point3::new(2.5, 1.5, 1.0)))
//! .with_concentration_thresholds(vec![1e-6])
//! // 2. Choose the numerics (HOW)
//! .with_solver(SolverConfiguration::default().with_integration(IntegrationMethod::CumulativeTrapezoid));
//!
//! // 3. Run and inspect
//! let result = run(&params).unwrap();
//! let (index, peak) = result.concentration.maximum(Geometry::Point, "desk").unwrap();
//! assert!(index.is_some() && peak > 0.0);
//! ```
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌──────────────────┐
//! │ ModelParameters  │  (validated)
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐   ┌──────────────────────┐
//! │ Scenario         │ ◄─│ SolverConfiguration  │ ← HOW
//! │ (model+monitors) │   │ (integrator, images) │
//! └────────┬─────────┘   └──────────────────────┘
//!          │ one grid per monitor
//! ┌────────▼─────────┐
//! │ DataStore        │ ──► ExposureTransform ──► DataStore
//! └────────┬─────────┘                              │
//!          └──────────────► Analyzer ◄──────────────┘
//!                              │
//!                    ┌─────────▼─────────┐
//!                    │ SimulationResult  │
//!                    └───────────────────┘
//! ```
//!
//! # Error Handling
//!
//! `run` and `run_batch` return [`SimulationError`](crate::error::SimulationError):
//! invalid parameters, grids the store rejects, or a worker pool that cannot
//! be built. NaN and infinite values produced by the kernels are data.

// =================================================================================================
// Module Declarations
// =================================================================================================
mod methods;
mod runner;
mod scenario;
mod traits;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Deciding *when* to hand work off to Rayon is a numerical-execution concern,
// not a physics concern, so it lives here rather than in the models.
//
// The threshold is stored in an AtomicUsize so that it can be changed at
// runtime (useful in benchmarks and tests) without requiring a mutex on every
// evaluation. Relaxed ordering is sufficient: the value is a performance
// hint, not a synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default amount of work (rows × points) above which evaluation switches to
/// parallel iteration.
///
/// Below that point the overhead of Rayon's dispatch outweighs the cost of
/// the image sums for a handful of points.
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

/// Runtime-configurable parallel-execution threshold.
///
/// Read via [`parallel_threshold()`], written via [`set_parallel_threshold()`].
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// The kernels evaluate time steps (trapezoid) or grid points (quadrature)
/// sequentially when the total work is below this value, and switch to Rayon
/// above it, but only when the crate is compiled with the `parallel` feature.
///
/// # Example
///
/// ```rust
/// use disperse_rs::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`.
///
/// # Example
///
/// ```rust
/// use disperse_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(2048);
/// assert_eq!(parallel_threshold(), 2048);
///
/// // Restore so other tests are not affected.
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// RAII guard that saves the current threshold on construction and restores
/// it on drop.
///
/// Only compiled in test builds. Guards are serialised through a lock so
/// that concurrently running tests never observe each other's value.
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[cfg(test)]
static THRESHOLD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
impl ThresholdGuard {
    pub(crate) fn save(new_value: usize) -> Self {
        let lock = THRESHOLD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous, _lock: lock }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        // Bypass the public setter so that restoring never panics.
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use methods::{cumulative_trapezoid, sample_response, AdaptiveQuadrature, CumulativeTrapezoid, QuadratureSum};
pub use runner::{run, run_batch};
pub use scenario::Scenario;
pub use traits::{
    ImpulseResponse,
    IntegrationMethod,
    SimulationResult,
    SolverConfiguration,
    TimeIntegrator,
};

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Map `f` over `0..count`, in parallel when `count × work` exceeds the
/// parallel threshold
///
/// `work` is the cost of one call in arbitrary units (typically the number
/// of points it evaluates). Results keep index order either way.
pub(crate) fn map_indexed<T, F>(count: usize, work: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    if count.saturating_mul(work.max(1)) > parallel_threshold() {
        map_parallel(count, f)
    } else {
        (0..count).map(f).collect()
    }
}

#[cfg(feature = "parallel")]
fn map_parallel<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..count).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_parallel<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..count).map(f).collect()
}

// =================================================================================================
// Tests
// =================================================================================================
