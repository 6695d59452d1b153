//! Time-integration strategies
//!
//! This module contains the concrete implementations of the
//! [`TimeIntegrator`](crate::solver::TimeIntegrator) trait.
//!
//! # Available Methods
//!
//! - **[`CumulativeTrapezoid`]**: samples the impulse response once per time
//!   step and accumulates a running trapezoid
//!   - Order: second-order O(dt²)
//!   - Cost: 1 response evaluation per time step
//!   - Use: **production runs**, large grids
//!
//! - **[`AdaptiveQuadrature`]**: adaptive Simpson per grid point between
//!   consecutive elapsed times
//!   - Accuracy: configured tolerance, independent of `dt`
//!   - Cost: tens of response evaluations per point and time step
//!   - Use: reference results, accuracy checks of the trapezoid
//!
//! Both agree to within the trapezoid's discretisation error; the choice is a
//! pure speed/accuracy trade-off made once per run.

mod quadrature;
mod trapezoid;

pub use quadrature::{AdaptiveQuadrature, QuadratureSum};
pub use trapezoid::{cumulative_trapezoid, CumulativeTrapezoid};

use ndarray::Array2;

use crate::solver::{map_indexed, ImpulseResponse};

/// Sample `response` at every elapsed time, one row per time step
///
/// Rows are evaluated in parallel once the grid exceeds the parallel
/// threshold.
pub fn sample_response(response: &dyn ImpulseResponse, elapsed: &[f64]) -> Array2<f64> {
    let width = response.len();
    let rows = map_indexed(elapsed.len(), width, |i| response.sample(elapsed[i]));

    let mut field = Array2::zeros((elapsed.len(), width));
    for (mut row, values) in field.rows_mut().into_iter().zip(rows) {
        for (out, value) in row.iter_mut().zip(values) {
            *out = value;
        }
    }
    field
}
