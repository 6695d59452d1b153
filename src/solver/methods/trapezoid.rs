//! Cumulative trapezoidal time integration
//!
//! # Mathematical Background
//!
//! On a uniform axis with step `dt` the running integral of samples `f_i`
//! is
//!
//! ```text
//! F_0 = 0
//! F_i = F_{i−1} + dt · (f_{i−1} + f_i) / 2
//! ```
//!
//! # Characteristics
//!
//! - **Order**: second-order accurate (error ~ O(dt²)) for smooth responses
//! - **Cost**: one response evaluation per time sample
//! - **Alignment**: the result shares the time axis of its input
//!
//! The same rule turns concentration into cumulative exposure, whatever
//! integrator produced the concentration.

use ndarray::{Array, Array2, Axis, Dimension, Slice, Zip};

use crate::solver::methods::sample_response;
use crate::solver::{ImpulseResponse, TimeIntegrator};

/// Fixed-step running trapezoid along the time axis
///
/// # Example
///
/// ```rust
/// use disperse_rs::solver::cumulative_trapezoid;
/// use ndarray::array;
///
/// let exposure = cumulative_trapezoid(&array![1.0, 1.0, 1.0, 1.0], 0.5);
/// assert_eq!(exposure, array![0.0, 0.5, 1.0, 1.5]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CumulativeTrapezoid;

impl TimeIntegrator for CumulativeTrapezoid {
    fn integrate(&self, response: &dyn ImpulseResponse, elapsed: &[f64], dt: f64) -> Array2<f64> {
        cumulative_trapezoid(&sample_response(response, elapsed), dt)
    }

    fn name(&self) -> &str {
        "Cumulative Trapezoid"
    }
}

/// Running trapezoidal integral along axis 0, starting from zero
///
/// NaN samples propagate to every later step of their column.
pub fn cumulative_trapezoid<D: Dimension>(values: &Array<f64, D>, dt: f64) -> Array<f64, D> {
    let mut out = Array::zeros(values.raw_dim());
    let steps = values.len_of(Axis(0));
    if steps < 2 {
        return out;
    }

    let previous = values.slice_axis(Axis(0), Slice::from(..steps - 1));
    let current = values.slice_axis(Axis(0), Slice::from(1..));
    Zip::from(out.slice_axis_mut(Axis(0), Slice::from(1..)))
        .and(&previous)
        .and(&current)
        .for_each(|area, &a, &b| *area = 0.5 * dt * (a + b));

    out.accumulate_axis_inplace(Axis(0), |&before, running| *running += before);
    out
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, ArrayD, IxDyn};

    /// Response growing linearly with τ at every point
    struct Ramp {
        slopes: Vec<f64>,
    }

    impl ImpulseResponse for Ramp {
        fn len(&self) -> usize {
            self.slopes.len()
        }

        fn sample(&self, tau: f64) -> Vec<f64> {
            self.slopes.iter().map(|&s| self.value(s, tau)).collect()
        }

        fn sample_point(&self, point: usize, tau: f64) -> f64 {
            self.value(self.slopes[point], tau)
        }
    }

    impl Ramp {
        fn value(&self, slope: f64, tau: f64) -> f64 {
            if tau <= 0.0 { 0.0 } else { slope * tau }
        }
    }

    #[test]
    fn test_constant_gives_linear_growth() {
        let dt = 0.25;
        let out = cumulative_trapezoid(&Array::from_elem(9, 3.0), dt);

        for k in 0..9 {
            assert_relative_eq!(out[k], 3.0 * k as f64 * dt, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_integrates_along_time_axis_only() {
        let values = array![[0.0, 2.0], [2.0, 2.0], [4.0, 2.0]];
        let out = cumulative_trapezoid(&values, 1.0);

        assert_eq!(out, array![[0.0, 0.0], [1.0, 2.0], [4.0, 4.0]]);
    }

    #[test]
    fn test_dynamic_rank() {
        let values = ArrayD::from_elem(IxDyn(&[4, 2, 3]), 1.0);
        let out = cumulative_trapezoid(&values, 2.0);

        assert_eq!(out.shape(), &[4, 2, 3]);
        assert_eq!(out[[3, 1, 2]], 6.0);
    }

    #[test]
    fn test_short_series() {
        assert_eq!(cumulative_trapezoid(&array![5.0], 1.0), array![0.0]);
        assert_eq!(cumulative_trapezoid(&Array::<f64, _>::zeros(0), 1.0).len(), 0);
    }

    #[test]
    fn test_nan_propagates_forward() {
        let out = cumulative_trapezoid(&array![1.0, f64::NAN, 1.0, 1.0], 1.0);

        assert_eq!(out[0], 0.0);
        assert!(out.iter().skip(1).all(|v| v.is_nan()));
    }

    #[test]
    fn test_integrator_is_exact_for_linear_response() {
        let ramp = Ramp { slopes: vec![1.0, 2.0] };
        let elapsed = [-1.0, 0.0, 1.0, 2.0, 3.0];
        let out = CumulativeTrapezoid.integrate(&ramp, &elapsed, 1.0);

        assert_eq!(out.shape(), &[5, 2]);
        // ∫₀^τ s·t dt = s·τ²/2
        assert_relative_eq!(out[[4, 0]], 4.5, epsilon = 1e-14);
        assert_relative_eq!(out[[4, 1]], 9.0, epsilon = 1e-14);
        assert_eq!(out[[1, 0]], 0.0);
    }
}
