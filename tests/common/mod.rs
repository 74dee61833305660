//! Common utilities for integration tests

pub mod scenarios;
pub mod test_helpers;

// Re-export commonly used items
pub use scenarios::{natural_uranium, recycled_uranium, sample_uranium, tungsten, Expected};
pub use test_helpers::{assert_close, assert_mass_conserved, relative_error};
