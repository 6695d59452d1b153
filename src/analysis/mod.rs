//! Result analysis
//!
//! Everything that happens after the models have been sampled:
//!
//! - **`store`**: [`DataStore`] keyed by [`Geometry`] and location id, with
//!   the maximum / exceedance / percentage queries
//! - **`exposure`**: [`ExposureTransform`], concentration → cumulative exposure
//! - **`records`**: [`ResultRecord`] shapes, their writer contract and
//!   [`worst_case`] reduction
//! - **`analyzer`**: [`Analyzer`], runs the queries over a whole store
//!
//! # Data Flow
//!
//! ```text
//! concentration store ──► ExposureTransform ──► exposure store
//!         │                                          │
//!         └──────────────► Analyzer ◄────────────────┘
//!                             │
//!                      Vec<ResultRecord>
//! ```

mod analyzer;
mod exposure;
mod records;
mod store;

pub use analyzer::Analyzer;
pub use exposure::ExposureTransform;
pub use records::{worst_case, Quantity, RecordDetail, ResultRecord};
pub use store::{unravel_index, DataStore, Geometry};
