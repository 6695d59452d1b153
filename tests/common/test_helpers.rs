//! Helper functions for integration tests

use disperse_rs::config::{ModelKind, ModelParameters};
use disperse_rs::models::{DiffusionSetting, MonitorLocation, SourceTerm};
use disperse_rs::physics::{Direction, DispersionModel, TimeAxis, Volume};
use disperse_rs::solver::Scenario;
use nalgebra::Point3;
use ndarray::ArrayD;

/// 3 m × 3 m × 3 m room
pub fn room() -> Volume {
    Volume::new(3.0, 3.0, 3.0)
}

/// Sealed room with one instantaneous 1 kg release at (1, 1, 1) and
/// D = 0.1 m²/s, sampled 5 times over 10 s at the source itself
pub fn instantaneous_release() -> ModelParameters {
    ModelParameters::new(
        ModelKind::EddyDiffusion,
        room(),
        TimeAxis::new(10.0, 5),
        DiffusionSetting::Explicit(0.1),
    )
    .with_source(SourceTerm::instantaneous("puff", Point3::new(1.0, 1.0, 1.0), 1.0, 0.0))
    .with_monitor(MonitorLocation::point("source", Point3::new(1.0, 1.0, 1.0)))
}

/// Ventilated room with a continuous leak and monitors of every geometry
/// class
pub fn ventilated_leak(model: ModelKind) -> ModelParameters {
    ModelParameters::new(model, room(), TimeAxis::new(120.0, 24), DiffusionSetting::Explicit(0.05))
        .with_fresh_air_rate(0.05)
        .with_spatial_samples([4, 4, 4])
        .with_source(SourceTerm::continuous("leak", Point3::new(1.0, 1.5, 0.5), 1e-4, 0.0))
        .with_monitor(MonitorLocation::point("desk", Point3::new(2.5, 1.5, 1.0)))
        .with_monitor(MonitorLocation::line("corridor", Direction::X, 1.5, 1.0))
        .with_monitor(MonitorLocation::plane("breathing", Direction::Z, 1.5))
        .with_monitor(MonitorLocation::domain("room"))
        .with_concentration_thresholds(vec![1e-7, 1e-5])
        .with_exposure_thresholds(vec![1e-6])
}

/// Scenario over the standard room with a 3 × 3 × 3 lattice
pub fn scenario_for(model: Box<dyn DispersionModel>, time: TimeAxis, monitors: Vec<MonitorLocation>) -> Scenario {
    Scenario::new(model, room(), time, [3, 3, 3], monitors)
}

/// Assert that two grids have the same shape and agree element-wise
///
/// NaN matches NaN.
pub fn assert_grids_close(a: &ArrayD<f64>, b: &ArrayD<f64>, tolerance: f64, message: &str) {
    assert_eq!(a.shape(), b.shape(), "{}: shape mismatch", message);

    for (i, (&x, &y)) in a.iter().zip(b.iter()).enumerate() {
        if x.is_nan() && y.is_nan() {
            continue;
        }
        let diff = (x - y).abs();
        assert!(
            diff <= tolerance,
            "{}: element {} differs by {} (tolerance {})",
            message,
            i,
            diff,
            tolerance
        );
    }
}

/// Root-mean-square difference over the finite elements of two grids
pub fn rms_difference(a: &ArrayD<f64>, b: &ArrayD<f64>) -> f64 {
    let (sum, count) = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .fold((0.0, 0usize), |(sum, count), (x, y)| (sum + (x - y).powi(2), count + 1));

    if count > 0 { (sum / count as f64).sqrt() } else { 0.0 }
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-30 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}
