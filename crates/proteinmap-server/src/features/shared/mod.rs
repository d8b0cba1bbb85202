//! Shared utilities for feature modules
//!
//! - **validation**: field-error collection and input validators
//! - **error_helpers**: unique-violation mapping
//! - **test_helpers**: fixtures for database tests (test-only)

pub mod error_helpers;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use validation::{FieldErrors, REQUIRED_MESSAGE};
