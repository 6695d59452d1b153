//! Eddy diffusion coefficient
//!
//! The coefficient is either given explicitly or derived from the turbulent
//! kinetic energy balance (TKEB) correlation
//!
//! ```text
//! term = Q / (V · N²)^(1/3)
//!
//! lower      → 0.827 · term + 0.0565
//! regression → 0.824 · term
//! upper      → max(0.822 · term − 0.0565, 0.001)
//! ```
//!
//! with `Q` the fresh-air rate \[m³/s\], `V` the enclosed volume \[m³\] and
//! `N` the number of vents. The bound names refer to the concentration
//! envelope each coefficient produces: faster mixing gives the lower
//! concentration bound, so the coefficients themselves are ordered
//! `upper ≤ regression ≤ lower` (until the clamp lifts `upper` above a
//! regression value smaller than 0.001).

use std::fmt;

use crate::error::ConfigError;

const LOWER_SLOPE: f64 = 0.827;
const LOWER_OFFSET: f64 = 0.0565;
const REGRESSION_SLOPE: f64 = 0.824;
const UPPER_SLOPE: f64 = 0.822;
const UPPER_OFFSET: f64 = 0.0565;

/// Smallest coefficient the upper bound may return \[m²/s\]
pub const MIN_UPPER_COEFFICIENT: f64 = 0.001;

/// Which TKEB correlation line to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffusionBound {
    Lower,
    Regression,
    Upper,
}

/// How the diffusion coefficient of a run is obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiffusionSetting {
    /// Literal coefficient \[m²/s\]
    Explicit(f64),

    /// TKEB correlation from the vent count and the fresh-air rate
    Correlation { vents: u32, bound: DiffusionBound },
}

impl DiffusionSetting {
    pub fn validate(&self, fresh_air_rate: f64) -> Result<(), ConfigError> {
        match *self {
            DiffusionSetting::Explicit(value) => {
                if !(value > 0.0 && value.is_finite()) {
                    return Err(ConfigError::NonPositiveDiffusion(value));
                }
            }
            DiffusionSetting::Correlation { vents, .. } => {
                if vents == 0 {
                    return Err(ConfigError::NoVents);
                }
                if fresh_air_rate <= 0.0 {
                    return Err(ConfigError::CorrelationWithoutFreshAir);
                }
            }
        }
        Ok(())
    }
}

/// Positive eddy diffusion coefficient \[m²/s\]
///
/// Resolved once per parameter set and constant for the run.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DiffusionCoefficient(f64);

impl DiffusionCoefficient {
    /// Use a literal coefficient
    ///
    /// # Panics
    ///
    /// Panics when `value` is not positive.
    pub fn explicit(value: f64) -> Self {
        assert!(value > 0.0, "Diffusion coefficient must be positive, got {}", value);
        Self(value)
    }

    /// Evaluate the TKEB correlation
    ///
    /// # Arguments
    ///
    /// * `fresh_air_rate` - Total fresh-air supply Q \[m³/s\]
    /// * `volume` - Enclosed volume V \[m³\]
    /// * `vents` - Number of vents N (at least 1)
    /// * `bound` - Correlation line
    ///
    /// # Example
    ///
    /// ```rust
    /// use disperse_rs::models::{DiffusionBound, DiffusionCoefficient};
    ///
    /// let d = DiffusionCoefficient::from_correlation(0.5, 27.0, 1, DiffusionBound::Regression);
    /// assert!((d.value() - 0.824 * 0.5 / 3.0).abs() < 1e-12);
    /// ```
    pub fn from_correlation(fresh_air_rate: f64, volume: f64, vents: u32, bound: DiffusionBound) -> Self {
        let vents = f64::from(vents.max(1));
        let term = fresh_air_rate / (volume * vents * vents).cbrt();

        let value = match bound {
            DiffusionBound::Lower => LOWER_SLOPE * term + LOWER_OFFSET,
            DiffusionBound::Regression => REGRESSION_SLOPE * term,
            DiffusionBound::Upper => (UPPER_SLOPE * term - UPPER_OFFSET).max(MIN_UPPER_COEFFICIENT),
        };

        Self(value)
    }

    /// Resolve a setting for one parameter set
    pub fn resolve(setting: &DiffusionSetting, fresh_air_rate: f64, volume: f64) -> Self {
        match *setting {
            DiffusionSetting::Explicit(value) => Self::explicit(value),
            DiffusionSetting::Correlation { vents, bound } => {
                Self::from_correlation(fresh_air_rate, volume, vents, bound)
            }
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for DiffusionCoefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m²/s", self.0)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
