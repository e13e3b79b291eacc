//! Resampling Error Types

use thiserror::Error;

/// Errors raised by the resampling primitives
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResampleError {
    /// Interpolation needs at least one source knot
    #[error("Source series is empty")]
    EmptySource,

    /// Time and value columns differ in length
    #[error("Length mismatch: {times} timestamps, {values} values")]
    LengthMismatch { times: usize, values: usize },

    /// Source timestamps must be strictly increasing
    #[error("Source timestamps not strictly increasing at index {index}")]
    NonIncreasingTime { index: usize },

    /// Grid rate must be a positive integer
    #[error("Invalid sampling rate: {0} Hz")]
    InvalidRate(u32),

    /// Gap threshold must be positive and finite
    #[error("Invalid gap threshold: {0} s")]
    InvalidGapThreshold(f64),
}
