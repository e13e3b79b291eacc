//! Contract Error Types

use thiserror::Error;

/// Errors while loading or checking the data contract
#[derive(Debug, Error)]
pub enum ContractError {
    /// YAML could not be read or deserialized
    #[error("Failed to load contract: {0}")]
    Load(#[from] config::ConfigError),

    /// Lock or contract file unreadable
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Contract text does not hash to the locked digest
    #[error("Lock mismatch: expected={expected}, actual={actual}")]
    LockMismatch { expected: String, actual: String },

    /// Contract drops a column the engine needs
    #[error("Contract does not require column: {0}")]
    MissingRequiredColumn(String),

    /// Contract values are inconsistent or unusable
    #[error("Invalid contract: {0}")]
    Invalid(String),
}
