//! Cumulative exposure
//!
//! `exposure[t] = ∫₀^t concentration dt`, evaluated with the fixed-step
//! running trapezoid on the run's time axis. The rule is the same whichever
//! integrator produced the concentration.

use ndarray::ArrayD;

use crate::analysis::{DataStore, Geometry};
use crate::error::StoreError;
use crate::solver::cumulative_trapezoid;

/// Concentration → exposure transform for one time axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureTransform {
    dt: f64,
}

impl ExposureTransform {
    pub fn new(dt: f64) -> Self {
        Self { dt }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Exposure grid of one concentration grid (same shape)
    pub fn apply(&self, concentration: &ArrayD<f64>) -> ArrayD<f64> {
        cumulative_trapezoid(concentration, self.dt)
    }

    /// Exposure store with the keys of `concentration`
    pub fn to_store(&self, concentration: &DataStore) -> Result<DataStore, StoreError> {
        let mut exposure = DataStore::new();
        for geometry in Geometry::ALL {
            for (id, grid) in concentration.iter(geometry) {
                exposure.insert(geometry, id, self.apply(grid))?;
            }
        }
        Ok(exposure)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::IxDyn;

    #[test]
    fn test_constant_concentration() {
        let transform = ExposureTransform::new(0.5);
        let grid = ArrayD::from_elem(IxDyn(&[6, 2]), 4.0);
        let exposure = transform.apply(&grid);

        for k in 0..6 {
            for p in 0..2 {
                assert_relative_eq!(exposure[[k, p]], 4.0 * k as f64 * 0.5, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_store_keeps_keys_and_shapes() {
        let mut store = DataStore::new();
        store.insert(Geometry::Point, "desk", ArrayD::from_elem(IxDyn(&[3]), 1.0)).unwrap();
        store.insert(Geometry::Plane, "floor", ArrayD::from_elem(IxDyn(&[3, 2, 2]), 2.0)).unwrap();

        let exposure = ExposureTransform::new(1.0).to_store(&store).unwrap();

        assert_eq!(exposure.len(), 2);
        assert_eq!(exposure.get(Geometry::Plane, "floor").unwrap().shape(), &[3, 2, 2]);
        assert_eq!(exposure.get(Geometry::Point, "desk").unwrap()[[2]], 2.0);
    }

    #[test]
    fn test_exposure_is_non_decreasing_for_non_negative_input() {
        let grid = ArrayD::from_shape_vec(IxDyn(&[5]), vec![0.0, 3.0, 0.5, 0.0, 2.0]).unwrap();
        let exposure = ExposureTransform::new(0.1).apply(&grid);

        for k in 1..5 {
            assert!(exposure[[k]] >= exposure[[k - 1]]);
        }
    }
}
