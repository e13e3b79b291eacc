//! Data Validation
//!
//! Checks telemetry rows against the contract's value constraints
//! (finite values, WGS-84 bounds, non-negative speed) before resampling.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidationConfig, ValidationResult, Validator};
