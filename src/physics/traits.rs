//! Dispersion model trait
//!
//! This module defines the core API every physical model implements:
//! given the time axis and the sample positions of one monitored location,
//! produce the concentration grid.

use ndarray::ArrayD;

use crate::physics::data::{SamplePositions, TimeAxis};

// ==================================================================================================
// Dispersion Model Trait
// =================================================================================================

/// Trait for contaminant dispersion models
///
/// # Responsibility
///
/// Evaluates the concentration field of every source in the enclosure at a
/// set of sample positions over the whole time axis. The model owns its
/// physics (closed-form solutions, source superposition) and whatever
/// numerical strategy it was configured with; the caller decides where and
/// when to sample it.
///
/// # Output Layout
///
/// The returned array has shape `[time.samples] + positions.shape()`:
/// axis 0 is always time, the remaining axes follow the spatial shape of
/// the positions. Values may be NaN or infinite where the closed form is
/// singular; callers must treat those as "no data".
pub trait DispersionModel: Send + Sync {
    /// Concentration at every position and time step \[kg/m³\]
    fn evaluate(&self, time: &TimeAxis, positions: &SamplePositions) -> ArrayD<f64>;

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;

    /// Description of the model (option)
    fn description(&self) -> Option<&str> {
        None
    }
}
