//! disperse-rs: Airborne Contaminant Dispersion in Enclosed Volumes
//!
//! Closed-form dispersion kernels for a contaminant released inside a
//! rectangular room, and the analysis that turns their output into
//! engineering answers: peak values, time to reach a threshold and the
//! fraction of a location above it.
//!
//! # Architecture
//!
//! disperse-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Models provide closed-form solutions (what is computed)
//!    - The solver chooses time integration, sampling and dispatch (how)
//!
//! 2. **Typed Results**
//!    - Grids are stored by geometry class with a checked rank
//!    - Missing answers are `None`, never sentinel values
//!    - NaN is "no data" and skipped by every query
//!
//! # Quick Start
//!
//! ```rust
//! use disperse_rs::prelude::*;
//! use nalgebra::Point3;
//!
//! # fn main() -> Result<(), SimulationError> {
//! // 1. Describe the room, the release and where to look
//! let params = ModelParameters::new(
//!     ModelKind::EddyDiffusion,
//!     Volume::new(3.0, 3.0, 3.0),
//!     TimeAxis::new(10.0, 5),
//!     DiffusionSetting::Explicit(0.1),
//! )
//! .with_source(SourceTerm::instantaneous("spill", Point3::new(1.0, 1.0, 1.0), 1.0, 0.0))
//! .with_monitor(MonitorLocation::point("source", Point3::new(1.0, 1.0, 1.0)))
//! .with_concentration_thresholds(vec![0.5]);
//!
//! // 2. Run
//! let result = run(&params)?;
//!
//! // 3. Inspect
//! let grid = result.concentration.get(Geometry::Point, "source")?;
//! assert_eq!(grid.shape(), &[5]);
//! for record in &result.records {
//!     println!("{}", record);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: model trait, time axis, volume, sample positions
//! - [`models`]: well-mixed and eddy-diffusion models, sources, monitors
//! - [`solver`]: time integrators, scenario, run drivers
//! - [`analysis`]: result store, exposure, records
//! - [`config`]: run parameters
//! - [`error`]: error types
//!
//! # Features
//!
//! - `parallel` (default): evaluate large grids and batches with Rayon

// Core modules
pub mod physics;

pub mod models;
pub mod solver;

pub mod analysis;
pub mod config;
pub mod error;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use disperse_rs::prelude::*;
    //! ```
    pub use crate::analysis::{DataStore, Geometry, Quantity, ResultRecord};
    pub use crate::config::{ModelKind, ModelParameters};
    pub use crate::error::SimulationError;
    pub use crate::models::{
        DiffusionBound,
        DiffusionSetting,
        MonitorLocation,
        SourceTerm,
    };
    pub use crate::physics::{DispersionModel, TimeAxis, Volume};
    pub use crate::solver::{run, run_batch, IntegrationMethod, SolverConfiguration};
}
