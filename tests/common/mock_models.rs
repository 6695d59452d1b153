//! Mock dispersion models for testing
//!
//! These models produce fields with known closed forms, so the solver and
//! analysis layers can be checked without depending on the real kernels.

use disperse_rs::physics::{DispersionModel, SamplePositions, TimeAxis};
use ndarray::{ArrayD, Axis, IxDyn};

// =================================================================================================
// Uniform Field: C(t, x) = c
// =================================================================================================

/// The same concentration everywhere and at all times
///
/// Exposure after `k` steps is exactly `c·k·dt`.
pub struct UniformField {
    pub value: f64,
}

impl UniformField {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl DispersionModel for UniformField {
    fn evaluate(&self, time: &TimeAxis, positions: &SamplePositions) -> ArrayD<f64> {
        ArrayD::from_elem(IxDyn(&positions.grid_shape(time.samples)), self.value)
    }

    fn name(&self) -> &str {
        "Uniform Field"
    }
}

// =================================================================================================
// Linear Ramp: C(t, x) = slope · t
// =================================================================================================

/// Concentration growing linearly in time
///
/// The trapezoidal rule is exact: exposure at `t` is `slope·t²/2`.
pub struct LinearRamp {
    pub slope: f64,
}

impl LinearRamp {
    pub fn new(slope: f64) -> Self {
        Self { slope }
    }

    /// Exact exposure at time `t`
    pub fn analytical_exposure(&self, t: f64) -> f64 {
        0.5 * self.slope * t * t
    }
}

impl DispersionModel for LinearRamp {
    fn evaluate(&self, time: &TimeAxis, positions: &SamplePositions) -> ArrayD<f64> {
        let mut grid = ArrayD::zeros(IxDyn(&positions.grid_shape(time.samples)));
        for (i, mut step) in grid.axis_iter_mut(Axis(0)).enumerate() {
            step.fill(self.slope * time.time_at(i));
        }
        grid
    }

    fn name(&self) -> &str {
        "Linear Ramp"
    }
}

// =================================================================================================
// Spike: zero except at one time step
// =================================================================================================

/// Zero everywhere except `value` at time index `step`
pub struct Spike {
    pub step: usize,
    pub value: f64,
}

impl Spike {
    pub fn new(step: usize, value: f64) -> Self {
        Self { step, value }
    }
}

impl DispersionModel for Spike {
    fn evaluate(&self, time: &TimeAxis, positions: &SamplePositions) -> ArrayD<f64> {
        let mut grid = ArrayD::zeros(IxDyn(&positions.grid_shape(time.samples)));
        if self.step < time.samples {
            grid.index_axis_mut(Axis(0), self.step).fill(self.value);
        }
        grid
    }

    fn name(&self) -> &str {
        "Spike"
    }
}

// =================================================================================================
// Sweep: a front moving along x
// =================================================================================================

/// Unit concentration behind a front at `x = speed · t`, zero ahead of it
///
/// The fraction of a lattice at or above any threshold in `(0, 1]` grows
/// with time, which makes percent queries predictable.
pub struct Sweep {
    pub speed: f64,
}

impl Sweep {
    pub fn new(speed: f64) -> Self {
        Self { speed }
    }
}

impl DispersionModel for Sweep {
    fn evaluate(&self, time: &TimeAxis, positions: &SamplePositions) -> ArrayD<f64> {
        let points = positions.points();
        let mut grid = ArrayD::zeros(IxDyn(&positions.grid_shape(time.samples)));

        for (i, mut step) in grid.axis_iter_mut(Axis(0)).enumerate() {
            let front = self.speed * time.time_at(i);
            for (value, point) in step.iter_mut().zip(points) {
                *value = if point.x <= front { 1.0 } else { 0.0 };
            }
        }
        grid
    }

    fn name(&self) -> &str {
        "Sweep"
    }
}
