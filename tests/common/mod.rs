//! Common utilities for integration tests

#![allow(dead_code)]

pub mod mock_models;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_models::{LinearRamp, Spike, Sweep, UniformField};
pub use test_helpers::{
    assert_grids_close,
    instantaneous_release,
    relative_error,
    rms_difference,
    room,
    scenario_for,
    ventilated_leak,
};
