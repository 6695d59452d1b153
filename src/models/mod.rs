//! Dispersion models and their building blocks
//!
//! All models implement the [`DispersionModel`](crate::physics::DispersionModel)
//! trait. A model owns the physics (closed-form solutions and superposition
//! of sources); the solver decides where and when it is sampled.
//!
//! # Available Models
//!
//! ## [`WellMixed`]: single compartment
//!
//! The enclosure is perfectly stirred: one concentration for the whole
//! volume, driven by the sources and diluted by fresh-air exchange. Cheap and
//! conservative far from the sources.
//!
//! ## [`EddyDiffusion`]: spatially resolved
//!
//! Closed-form solution of turbulent diffusion inside a box with reflecting
//! walls (method of images), with the same fresh-air removal. Resolves the
//! concentration gradient around each source.
//!
//! # Building Blocks
//!
//! - [`SourceTerm`] / [`Emission`]: where and how contaminant is released
//! - [`DiffusionCoefficient`]: explicit or TKEB correlation
//! - [`ImageSeries`]: manual or converged image-series truncation
//! - [`MonitorLocation`]: points, lines, planes or the whole domain

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod diffusion;
pub mod eddy_diffusion;
pub mod images;
pub mod monitor;
pub mod source;
pub mod well_mixed;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use diffusion::{DiffusionBound, DiffusionCoefficient, DiffusionSetting};
pub use eddy_diffusion::EddyDiffusion;
pub use images::{ImageSeries, ImageSum, ImageTruncation};
pub use monitor::{MonitorKind, MonitorLocation};
pub use source::{Emission, SourceTerm};
pub use well_mixed::WellMixed;
