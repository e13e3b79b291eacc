//! Validation Error Types

use thiserror::Error;

/// Errors during data validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value is NaN or infinite
    #[error("{field} value is not finite")]
    NonFinite { field: &'static str },

    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value below its contract minimum
    #[error("{field} value {value} is below minimum {min}")]
    BelowMinimum {
        field: &'static str,
        value: f64,
        min: f64,
    },
}
