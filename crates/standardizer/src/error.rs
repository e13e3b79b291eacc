//! Standardization Error Types

use telemetry_resample::ResampleError;
use thiserror::Error;

/// Errors contained at the boundary of one input file
#[derive(Debug, Error)]
pub enum StandardizeError {
    /// Input lacks contract columns; the file is skipped
    #[error("missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV structure could not be parsed or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Resampling primitives rejected the series
    #[error("Resample error: {0}")]
    Resample(#[from] ResampleError),

    /// Settings are unusable
    #[error("Configuration error: {0}")]
    Config(String),
}
