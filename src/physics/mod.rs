//! Physical description of the enclosure
//!
//! This module provides the trait every dispersion model implements and the
//! data types the models are sampled on.
//!
//! # Core Concepts
//!
//! - **Dispersion Model**: Evaluates the concentration field over time
//! - **Time Axis**: Uniform sampling of the simulated interval
//! - **Volume**: The rectangular enclosure with no-flux walls
//! - **Sample Positions**: Flattened positions of one monitored location
//!
//! # Architecture
//!
//! Physical models are **separate from numerical strategies**:
//! - The model provides the **closed-form solution** (physics)
//! - The solver module provides **how** it is integrated in time and which
//!   positions it is evaluated at (numerics)
//!
//! # Example
//!
//! ```rust
//! use disperse_rs::physics::{DispersionModel, SamplePositions, TimeAxis, Volume};
//! use disperse_rs::models::{SourceTerm, WellMixed};
//! use nalgebra::Point3;
//!
//! let volume = Volume::new(3.0, 3.0, 3.0);
//! let source = SourceTerm::instantaneous("spill", Point3::new(1.0, 1.0, 1.0), 1.0, 0.0);
//! let model = WellMixed::new(volume, 0.01, vec![source]);
//!
//! let grid = model.evaluate(
//!     &TimeAxis::new(10.0, 5),
//!     &SamplePositions::single(Point3::new(2.0, 2.0, 2.0)),
//! );
//! assert_eq!(grid.shape(), &[5]);
//! ```

// module declaration
pub mod traits;
pub mod data;

// re-export commonly used types for convenience
pub use data::{linspace, Direction, SamplePositions, TimeAxis, Volume};
pub use traits::DispersionModel;
