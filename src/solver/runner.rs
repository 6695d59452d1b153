//! Run drivers
//!
//! [`run`] evaluates one parameter set from validation to records.
//! [`run_batch`] evaluates many independent sets on a fixed-size worker
//! pool; every task owns its result, so no store is ever shared.

use log::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::analysis::{Analyzer, ExposureTransform, Quantity};
use crate::config::{ModelKind, ModelParameters};
use crate::error::SimulationError;
use crate::solver::{Scenario, SimulationResult};

/// Evaluate one parameter set
///
/// Validates the parameters, samples the model at every monitored location,
/// applies near-source exclusion, builds the exposure store and extracts
/// the records of both quantities.
///
/// # Example
///
/// ```rust
/// use disperse_rs::config::{ModelKind, ModelParameters};
/// use disperse_rs::models::{DiffusionSetting, MonitorLocation, SourceTerm};
/// use disperse_rs::physics::{TimeAxis, Volume};
/// use disperse_rs::solver::run;
/// use nalgebra::Point3;
///
/// let params = ModelParameters::new(
///     ModelKind::WellMixed,
///     Volume::new(3.0, 3.0, 3.0),
///     TimeAxis::new(100.0, 10),
///     DiffusionSetting::Explicit(0.1),
/// )
/// .with_fresh_air_rate(0.1)
/// .with_source(SourceTerm::continuous("leak", Point3::new(1.0, 1.0, 1.0), 0.01, 0.0))
/// .with_monitor(MonitorLocation::point("desk", Point3::new(2.0, 2.0, 1.0)))
/// .with_concentration_thresholds(vec![0.01]);
///
/// let result = run(&params).unwrap();
/// assert_eq!(result.len(), 10);
/// assert_eq!(result.metadata["model"], "Well Mixed");
/// ```
pub fn run(params: &ModelParameters) -> Result<SimulationResult, SimulationError> {
    let scenario = Scenario::from_parameters(params)?;
    info!(
        "running {} over {} monitors, {} sources, {} time samples",
        scenario.model_name(),
        params.monitors.len(),
        params.sources.len(),
        params.time.samples
    );

    let dt = params.time.dt();
    let concentration = scenario.evaluate()?;
    let exposure = ExposureTransform::new(dt).to_store(&concentration)?;

    let analyzer = Analyzer::new(dt, params.percent_target);
    let mut records = analyzer.analyze(&concentration, Quantity::Concentration, &params.thresholds.concentration)?;
    records.extend(analyzer.analyze(&exposure, Quantity::Exposure, &params.thresholds.exposure)?);

    let mut result = SimulationResult::new(params.time.times(), concentration, exposure, records);
    result.add_metadata("model", scenario.model_name());
    result.add_metadata("time_step", dt.to_string());
    if params.model == ModelKind::EddyDiffusion {
        result.add_metadata("integrator", params.solver.integration.name());
        result.add_metadata("diffusion_coefficient", params.diffusion_coefficient().value().to_string());
    }

    info!("{} finished with {} records", scenario.model_name(), result.records.len());
    Ok(result)
}

/// Evaluate independent parameter sets on `workers` threads
///
/// Results come back in the order of `sets`. The first failing set aborts
/// the batch. `workers == 0` lets the pool pick one thread per core. Without
/// the `parallel` feature the sets run one after the other.
pub fn run_batch(sets: &[ModelParameters], workers: usize) -> Result<Vec<SimulationResult>, SimulationError> {
    info!("batch of {} parameter sets on {} workers", sets.len(), workers);
    run_all(sets, workers)
}

#[cfg(feature = "parallel")]
fn run_all(sets: &[ModelParameters], workers: usize) -> Result<Vec<SimulationResult>, SimulationError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| SimulationError::ThreadPool(e.to_string()))?;

    pool.install(|| sets.par_iter().map(run).collect())
}

#[cfg(not(feature = "parallel"))]
fn run_all(sets: &[ModelParameters], _workers: usize) -> Result<Vec<SimulationResult>, SimulationError> {
    sets.iter().map(run).collect()
}

// =================================================================================================
// Tests
// =================================================================================================
