//! Emission sources
//!
//! Defines where contaminant enters the enclosure and how its release is
//! distributed in TIME.
//!
//! # Types
//!
//! - **Instantaneous**: a mass released all at once (puff)
//! - **Continuous**: a constant rate that never switches off
//! - **FixedDuration**: a constant rate between a start and an end time
//!
//! # Example
//!
//! ```rust
//! use disperse_rs::models::{Emission, SourceTerm};
//! use nalgebra::Point3;
//!
//! // 0.5 kg/s leak from t = 10 s to t = 70 s
//! let leak = SourceTerm::fixed_duration("valve", Point3::new(1.0, 2.0, 0.5), 0.5, 10.0, 70.0);
//!
//! assert_eq!(leak.distance_to(&Point3::new(1.0, 2.0, 2.5)), 2.0);
//! assert!(matches!(leak.emission, Emission::FixedDuration { .. }));
//! ```

use nalgebra::Point3;

/// Release profile of one source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emission {
    /// Puff release
    ///
    /// # Parameters
    ///
    /// - `mass` : Released mass \[kg\]
    /// - `release_time` : Time of release \[s\]
    Instantaneous { mass: f64, release_time: f64 },

    /// Constant release that never stops
    ///
    /// # Parameters
    ///
    /// - `rate` : Emission rate \[kg/s\]
    /// - `release_time` : Start of the release \[s\]
    Continuous { rate: f64, release_time: f64 },

    /// Constant release over a bounded interval
    ///
    /// # Parameters
    ///
    /// - `rate` : Emission rate \[kg/s\]
    /// - `start_time` : Start of the release \[s\]
    /// - `end_time` : End of the release \[s\]
    FixedDuration {
        rate: f64,
        start_time: f64,
        end_time: f64,
    },
}

impl Emission {
    /// Short variant name (used in logs and error messages)
    pub fn kind(&self) -> &'static str {
        match self {
            Emission::Instantaneous { .. } => "instantaneous",
            Emission::Continuous { .. } => "continuous",
            Emission::FixedDuration { .. } => "fixed-duration",
        }
    }
}

/// One named emission event
///
/// Immutable once built; one instance per named source of a parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTerm {
    /// Source name
    pub name: String,

    /// Position inside the enclosure \[m\]
    pub position: Point3<f64>,

    /// Release profile
    pub emission: Emission,
}

// ==================== Implementation ====================
impl SourceTerm {
    /// Create a puff release
    ///
    /// # Arguments
    ///
    /// * `name` - Source name
    /// * `position` - Release position \[m\]
    /// * `mass` - Released mass \[kg\]
    /// * `release_time` - Release time \[s\]
    pub fn instantaneous(
        name: impl Into<String>,
        position: Point3<f64>,
        mass: f64,
        release_time: f64,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            emission: Emission::Instantaneous { mass, release_time },
        }
    }

    /// Create a release that never switches off
    pub fn continuous(
        name: impl Into<String>,
        position: Point3<f64>,
        rate: f64,
        release_time: f64,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            emission: Emission::Continuous { rate, release_time },
        }
    }

    /// Create a release that runs from `start_time` to `end_time`
    ///
    /// # Panics
    ///
    /// Panics when `end_time < start_time`.
    pub fn fixed_duration(
        name: impl Into<String>,
        position: Point3<f64>,
        rate: f64,
        start_time: f64,
        end_time: f64,
    ) -> Self {
        assert!(
            end_time >= start_time,
            "Fixed-duration source must end after it starts"
        );
        Self {
            name: name.into(),
            position,
            emission: Emission::FixedDuration {
                rate,
                start_time,
                end_time,
            },
        }
    }

    /// Distance from the source to `point` \[m\]
    pub fn distance_to(&self, point: &Point3<f64>) -> f64 {
        nalgebra::distance(&self.position, point)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
