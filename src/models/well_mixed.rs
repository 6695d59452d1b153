//! Well-mixed single-compartment model
//!
//! The enclosure is treated as one perfectly stirred compartment. The
//! concentration obeys
//!
//! ```text
//! V · dC/dt = S(t) − Q · C
//! ```
//!
//! with `V` the volume, `Q` the fresh-air rate and `S` the emission. With
//! `k = Q / V` and `τ` the time since a source switched on:
//!
//! - **Instantaneous**: `(m / V) · exp(−k·τ)`
//! - **Continuous**: `(rate · τ / V) · φ(k·τ)`, `φ(x) = (1 − e^(−x)) / x`
//! - **FixedDuration**: the continuous rise while active, then exponential
//!   decay from the value reached at shutoff
//!
//! `φ` is evaluated with `expm1` so that the rise stays exact when `Q` is
//! zero (pure accumulation `rate · τ / V`).

use log::debug;
use ndarray::{ArrayD, IxDyn};

use crate::models::source::{Emission, SourceTerm};
use crate::physics::{DispersionModel, SamplePositions, TimeAxis, Volume};

/// Well-mixed dispersion model
#[derive(Debug, Clone)]
pub struct WellMixed {
    volume: Volume,
    fresh_air_rate: f64,
    sources: Vec<SourceTerm>,
}

impl WellMixed {
    /// Create a well-mixed model
    ///
    /// A zero fresh-air rate is replaced by the smallest positive `f64`.
    pub fn new(volume: Volume, fresh_air_rate: f64, sources: Vec<SourceTerm>) -> Self {
        let fresh_air_rate = if fresh_air_rate > 0.0 {
            fresh_air_rate
        } else {
            f64::MIN_POSITIVE
        };

        Self {
            volume,
            fresh_air_rate,
            sources,
        }
    }

    /// Air-exchange decay constant `Q / V` \[1/s\]
    pub fn decay_rate(&self) -> f64 {
        self.fresh_air_rate / self.volume.volume()
    }

    /// Concentration at time `t`, summed over every source \[kg/m³\]
    pub fn concentration(&self, t: f64) -> f64 {
        self.sources.iter().map(|source| self.contribution(source, t)).sum()
    }

    /// Concentration at every sample of `time`
    pub fn time_series(&self, time: &TimeAxis) -> Vec<f64> {
        time.times().into_iter().map(|t| self.concentration(t)).collect()
    }

    fn contribution(&self, source: &SourceTerm, t: f64) -> f64 {
        let k = self.decay_rate();
        let v = self.volume.volume();

        match source.emission {
            Emission::Instantaneous { mass, release_time } => {
                let tau = t - release_time;
                if tau < 0.0 {
                    0.0
                } else {
                    mass / v * (-k * tau).exp()
                }
            }
            Emission::Continuous { rate, release_time } => rise(rate, v, k, t - release_time),
            Emission::FixedDuration {
                rate,
                start_time,
                end_time,
            } => {
                if t <= end_time {
                    rise(rate, v, k, t - start_time)
                } else {
                    let frozen = rise(rate, v, k, end_time - start_time);
                    frozen * (-k * (t - end_time)).exp()
                }
            }
        }
    }
}

/// Continuous-release rise `rate·τ/V · φ(k·τ)`, zero before the release
fn rise(rate: f64, volume: f64, k: f64, tau: f64) -> f64 {
    if tau <= 0.0 {
        return 0.0;
    }
    rate * tau / volume * relative_growth(k * tau)
}

/// `φ(x) = (1 − e^(−x)) / x` with `φ(0) = 1`
fn relative_growth(x: f64) -> f64 {
    if x.abs() < 1e-8 {
        1.0 - 0.5 * x
    } else {
        -(-x).exp_m1() / x
    }
}

impl DispersionModel for WellMixed {
    fn evaluate(&self, time: &TimeAxis, positions: &SamplePositions) -> ArrayD<f64> {
        debug!(
            "well mixed: {} sources broadcast over {} points",
            self.sources.len(),
            positions.len()
        );

        let series = self.time_series(time);
        let shape = positions.grid_shape(time.samples);
        ArrayD::from_shape_fn(IxDyn(&shape), |index| series[index[0]])
    }

    fn name(&self) -> &str {
        "Well Mixed"
    }

    fn description(&self) -> Option<&str> {
        Some("Single perfectly stirred compartment with first-order air exchange")
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn room() -> Volume {
        Volume::new(3.0, 3.0, 3.0)
    }

    fn centre() -> Point3<f64> {
        Point3::new(1.5, 1.5, 1.5)
    }

    #[test]
    fn test_instantaneous_decay() {
        let source = SourceTerm::instantaneous("puff", centre(), 2.7, 10.0);
        let model = WellMixed::new(room(), 0.27, vec![source]);

        assert_eq!(model.concentration(9.0), 0.0);
        assert_relative_eq!(model.concentration(10.0), 0.1, epsilon = 1e-15);
        // k = 0.01 1/s
        assert_relative_eq!(model.concentration(110.0), 0.1 * (-1.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_continuous_approaches_steady_state() {
        let source = SourceTerm::continuous("leak", centre(), 0.01, 0.0);
        let model = WellMixed::new(room(), 0.5, vec![source]);

        let steady = 0.01 / 0.5;
        let k = model.decay_rate();
        assert_relative_eq!(
            model.concentration(30.0),
            steady * (1.0 - (-k * 30.0).exp()),
            max_relative = 1e-12
        );
        assert_relative_eq!(model.concentration(1e5), steady, max_relative = 1e-9);
    }

    #[test]
    fn test_zero_fresh_air_accumulates() {
        let source = SourceTerm::continuous("leak", centre(), 0.01, 5.0);
        let model = WellMixed::new(room(), 0.0, vec![source]);

        assert_eq!(model.concentration(5.0), 0.0);
        assert_relative_eq!(model.concentration(105.0), 0.01 * 100.0 / 27.0, max_relative = 1e-12);
        assert!(model.concentration(1e9).is_finite());
    }

    #[test]
    fn test_fixed_duration_freezes_then_decays() {
        let source = SourceTerm::fixed_duration("valve", centre(), 0.02, 0.0, 50.0);
        let continuous = SourceTerm::continuous("leak", centre(), 0.02, 0.0);
        let fixed = WellMixed::new(room(), 0.27, vec![source]);
        let open = WellMixed::new(room(), 0.27, vec![continuous]);

        assert_relative_eq!(fixed.concentration(25.0), open.concentration(25.0), epsilon = 1e-15);

        let at_shutoff = fixed.concentration(50.0);
        let k = fixed.decay_rate();
        assert_relative_eq!(
            fixed.concentration(80.0),
            at_shutoff * (-k * 30.0).exp(),
            max_relative = 1e-12
        );
        assert!(fixed.concentration(80.0) < at_shutoff);
    }

    #[test]
    fn test_sources_superpose() {
        let a = SourceTerm::instantaneous("a", centre(), 1.0, 0.0);
        let b = SourceTerm::continuous("b", centre(), 0.01, 2.0);

        let both = WellMixed::new(room(), 0.1, vec![a.clone(), b.clone()]);
        let only_a = WellMixed::new(room(), 0.1, vec![a]);
        let only_b = WellMixed::new(room(), 0.1, vec![b]);

        for t in [0.0, 1.0, 7.5, 60.0] {
            assert_relative_eq!(
                both.concentration(t),
                only_a.concentration(t) + only_b.concentration(t),
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn test_relative_growth_is_smooth_near_zero() {
        assert_eq!(relative_growth(0.0), 1.0);
        assert_relative_eq!(relative_growth(1e-9), relative_growth(1e-7), epsilon = 1e-7);
        assert_relative_eq!(relative_growth(1.0), 1.0 - (-1.0f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_evaluate_broadcasts_over_space() {
        let source = SourceTerm::instantaneous("puff", centre(), 1.0, 0.0);
        let model = WellMixed::new(room(), 0.1, vec![source]);
        let time = TimeAxis::new(10.0, 4);

        let plane = SamplePositions::new(vec![2, 3], vec![Point3::origin(); 6]);
        let grid = model.evaluate(&time, &plane);
        let series = model.time_series(&time);

        assert_eq!(grid.shape(), &[4, 2, 3]);
        for t in 0..4 {
            for u in 0..2 {
                for v in 0..3 {
                    assert_eq!(grid[[t, u, v]], series[t]);
                }
            }
        }
    }

    #[test]
    fn test_name() {
        let model = WellMixed::new(room(), 0.1, Vec::new());
        assert_eq!(model.name(), "Well Mixed");
        assert_eq!(model.concentration(5.0), 0.0);
    }
}
