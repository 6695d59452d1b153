//! Adaptive Simpson quadrature per grid point
//!
//! # Mathematical Background
//!
//! Simpson's rule on `[a, b]` with midpoint `m`:
//!
//! ```text
//! S(a, b) = (b − a) / 6 · (f(a) + 4·f(m) + f(b))
//! ```
//!
//! The interval is bisected until the two halves agree with the whole to
//! within `15 · ε` (Richardson estimate), after which the extrapolated value
//! `S_left + S_right + Δ/15` is returned. The tolerance `ε` halves with every
//! bisection.
//!
//! # Characteristics
//!
//! - **Accuracy**: controlled by `abs_tol` and `rel_tol` per time interval
//! - **Cost**: O(points × time steps) interval integrations, each with at
//!   least `2^(min_depth + 1)` response evaluations
//! - **Use**: reference results and small grids
//!
//! The running integral `∫₀^elapsed` is accumulated interval by interval,
//! so no range is integrated twice.
//!
//! # Unresolved Panels
//!
//! A panel that is still outside tolerance at `max_depth`, or whose estimate
//! is not finite, is accepted as is. Near a singular integrand (a sample at
//! the source itself) the result then depends on `max_depth`. Such intervals
//! are counted and reported once per [`TimeIntegrator::integrate`] call.

use log::warn;
use ndarray::Array2;

use crate::solver::{map_indexed, ImpulseResponse, TimeIntegrator};

/// Adaptive Simpson integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveQuadrature {
    /// Absolute tolerance floor
    pub abs_tol: f64,

    /// Tolerance relative to the interval integral
    pub rel_tol: f64,

    /// Bisections always performed
    pub min_depth: u32,

    /// Bisections never exceeded
    pub max_depth: u32,
}

/// Integral over one interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureSum {
    pub value: f64,

    /// False when some panel was accepted without meeting the tolerance
    pub converged: bool,
}

impl std::ops::Add for QuadratureSum {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            value: self.value + other.value,
            converged: self.converged && other.converged,
        }
    }
}

impl Default for AdaptiveQuadrature {
    fn default() -> Self {
        Self {
            abs_tol: 1e-12,
            rel_tol: 1e-10,
            min_depth: 4,
            max_depth: 48,
        }
    }
}

impl AdaptiveQuadrature {
    /// Default settings with a custom relative tolerance
    pub fn with_tolerance(rel_tol: f64) -> Self {
        Self {
            rel_tol,
            ..Self::default()
        }
    }

    /// Integrate `f` over `[a, b]`; empty or reversed ranges give zero
    ///
    /// # Example
    ///
    /// ```rust
    /// use disperse_rs::solver::AdaptiveQuadrature;
    ///
    /// let quad = AdaptiveQuadrature::default();
    /// let area = quad.integrate_scalar(|t| (-t).exp(), 0.0, 1.0);
    /// assert!(area.converged);
    /// assert!((area.value - (1.0 - (-1.0f64).exp())).abs() < 1e-10);
    /// ```
    pub fn integrate_scalar<F>(&self, f: F, a: f64, b: f64) -> QuadratureSum
    where
        F: Fn(f64) -> f64,
    {
        if !(b > a) {
            return QuadratureSum {
                value: 0.0,
                converged: true,
            };
        }

        let (fa, fm, fb) = (f(a), f(0.5 * (a + b)), f(b));
        let whole = simpson(a, b, fa, fm, fb);
        let eps = self.abs_tol.max(self.rel_tol * whole.abs());

        self.refine(&f, Panel { a, b, fa, fm, fb, whole }, eps, 0)
    }

    fn refine<F>(&self, f: &F, panel: Panel, eps: f64, depth: u32) -> QuadratureSum
    where
        F: Fn(f64) -> f64,
    {
        let Panel { a, b, fa, fm, fb, whole } = panel;
        let m = 0.5 * (a + b);
        let (flm, frm) = (f(0.5 * (a + m)), f(0.5 * (m + b)));

        let left = simpson(a, m, fa, flm, fm);
        let right = simpson(m, b, fm, frm, fb);
        let delta = left + right - whole;

        let settled = depth >= self.min_depth && delta.abs() <= 15.0 * eps;
        if settled || depth >= self.max_depth || !delta.is_finite() {
            return QuadratureSum {
                value: left + right + delta / 15.0,
                converged: settled,
            };
        }

        let left_panel = Panel { a, b: m, fa, fm: flm, fb: fm, whole: left };
        let right_panel = Panel { a: m, b, fa: fm, fm: frm, fb, whole: right };

        self.refine(f, left_panel, 0.5 * eps, depth + 1)
            + self.refine(f, right_panel, 0.5 * eps, depth + 1)
    }
}

impl TimeIntegrator for AdaptiveQuadrature {
    fn integrate(&self, response: &dyn ImpulseResponse, elapsed: &[f64], _dt: f64) -> Array2<f64> {
        let (field, unresolved) = self.running_integrals(response, elapsed);
        if unresolved > 0 {
            warn!(
                "adaptive quadrature hit max depth {} on {} of {} intervals; results there depend on the depth",
                self.max_depth,
                unresolved,
                response.len() * elapsed.len()
            );
        }
        field
    }

    fn name(&self) -> &str {
        "Adaptive Quadrature"
    }
}

impl AdaptiveQuadrature {
    /// Running integrals, shape `[time, point]`, and the number of
    /// intervals that did not converge
    fn running_integrals(&self, response: &dyn ImpulseResponse, elapsed: &[f64]) -> (Array2<f64>, usize) {
        let columns = map_indexed(response.len(), elapsed.len(), |point| {
            let mut running = 0.0;
            let mut reached = 0.0;
            let mut unresolved = 0;
            let values = elapsed
                .iter()
                .map(|&tau| {
                    if tau > reached {
                        let interval = self.integrate_scalar(|s| response.sample_point(point, s), reached, tau);
                        if !interval.converged {
                            unresolved += 1;
                        }
                        running += interval.value;
                        reached = tau;
                    }
                    running
                })
                .collect::<Vec<f64>>();
            (values, unresolved)
        });

        let mut field = Array2::zeros((elapsed.len(), response.len()));
        let mut unresolved = 0;
        for (mut column, (values, count)) in field.columns_mut().into_iter().zip(columns) {
            for (out, value) in column.iter_mut().zip(values) {
                *out = value;
            }
            unresolved += count;
        }
        (field, unresolved)
    }
}

/// Interval with its three Simpson samples and estimate
#[derive(Debug, Clone, Copy)]
struct Panel {
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
}

fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    struct Decay {
        rates: Vec<f64>,
    }

    impl ImpulseResponse for Decay {
        fn len(&self) -> usize {
            self.rates.len()
        }

        fn sample(&self, tau: f64) -> Vec<f64> {
            (0..self.len()).map(|p| self.sample_point(p, tau)).collect()
        }

        fn sample_point(&self, point: usize, tau: f64) -> f64 {
            if tau <= 0.0 { 0.0 } else { (-self.rates[point] * tau).exp() }
        }
    }

    #[test]
    fn test_polynomial_is_exact() {
        // Simpson is exact for cubics
        let quad = AdaptiveQuadrature::default();
        let area = quad.integrate_scalar(|t| t * t * t - 2.0 * t, 0.0, 2.0);
        assert_relative_eq!(area.value, 0.0, epsilon = 1e-12);
        assert!(area.converged);
    }

    #[test]
    fn test_smooth_integrand() {
        let quad = AdaptiveQuadrature::default();
        let area = quad.integrate_scalar(f64::sin, 0.0, std::f64::consts::PI);
        assert_relative_eq!(area.value, 2.0, max_relative = 1e-10);
    }

    #[test]
    fn test_sharp_peak() {
        // exp(-1/t) / t² integrates to exp(-1/b) on (0, b]
        let quad = AdaptiveQuadrature::default();
        let area = quad.integrate_scalar(|t| if t <= 0.0 { 0.0 } else { (-1.0 / t).exp() / (t * t) }, 0.0, 20.0);
        assert_relative_eq!(area.value, (-1.0f64 / 20.0).exp(), max_relative = 1e-8);
    }

    #[test]
    fn test_empty_and_reversed_ranges() {
        let quad = AdaptiveQuadrature::default();
        assert_eq!(quad.integrate_scalar(|_| 1.0, 1.0, 1.0).value, 0.0);
        assert_eq!(quad.integrate_scalar(|_| 1.0, 2.0, 1.0).value, 0.0);
    }

    #[test]
    fn test_min_depth_is_respected() {
        let calls = Cell::new(0usize);
        let quad = AdaptiveQuadrature::default();
        quad.integrate_scalar(
            |_| {
                calls.set(calls.get() + 1);
                1.0
            },
            0.0,
            1.0,
        );

        // 3 initial samples plus 2 per panel over depths 0..=4
        assert_eq!(calls.get(), 3 + 2 * 31);
    }

    #[test]
    fn test_running_integral() {
        let decay = Decay { rates: vec![1.0, 0.5] };
        let elapsed = [-0.5, 0.0, 0.5, 1.0, 1.5, 2.0];
        let out = AdaptiveQuadrature::default().integrate(&decay, &elapsed, 0.5);

        assert_eq!(out.shape(), &[6, 2]);
        assert_eq!(out[[0, 0]], 0.0);
        assert_eq!(out[[1, 1]], 0.0);
        for (i, &tau) in elapsed.iter().enumerate().skip(2) {
            assert_relative_eq!(out[[i, 0]], 1.0 - (-tau).exp(), max_relative = 1e-9);
            assert_relative_eq!(out[[i, 1]], (1.0 - (-0.5 * tau).exp()) / 0.5, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_singular_integrand_is_flagged() {
        // t^(-3/2) is not integrable at 0
        let quad = AdaptiveQuadrature::default();
        let area = quad.integrate_scalar(|t| if t <= 0.0 { 0.0 } else { t.powf(-1.5) }, 0.0, 1.0);
        assert!(!area.converged);

        let shallow = AdaptiveQuadrature {
            max_depth: 20,
            ..AdaptiveQuadrature::default()
        };
        let capped = shallow.integrate_scalar(|t| if t <= 0.0 { 0.0 } else { t.powf(-1.5) }, 0.0, 1.0);
        assert!(!capped.converged);
        assert!(area.value > capped.value);
    }

    #[test]
    fn test_unresolved_intervals_are_counted() {
        struct Singular;

        impl ImpulseResponse for Singular {
            fn len(&self) -> usize {
                2
            }

            fn sample(&self, tau: f64) -> Vec<f64> {
                (0..2).map(|p| self.sample_point(p, tau)).collect()
            }

            // Point 0 sits on the singularity, point 1 decays smoothly
            fn sample_point(&self, point: usize, tau: f64) -> f64 {
                match point {
                    _ if tau <= 0.0 => 0.0,
                    0 => tau.powf(-1.5),
                    _ => (-tau).exp(),
                }
            }
        }

        let elapsed = [0.0, 0.5, 1.0, 1.5];
        let (field, unresolved) = AdaptiveQuadrature::default().running_integrals(&Singular, &elapsed);

        // Only the first interval of point 0 touches τ = 0
        assert_eq!(unresolved, 1);
        assert_relative_eq!(field[[3, 1]], 1.0 - (-1.5f64).exp(), max_relative = 1e-9);

        let (_, smooth) = AdaptiveQuadrature::default().running_integrals(&Decay { rates: vec![1.0] }, &elapsed);
        assert_eq!(smooth, 0);
    }

    #[test]
    fn test_with_tolerance() {
        let quad = AdaptiveQuadrature::with_tolerance(1e-6);
        assert_eq!(quad.rel_tol, 1e-6);
        assert_eq!(quad.min_depth, 4);
    }
}
