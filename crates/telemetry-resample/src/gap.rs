//! Gap Policy Enforcer
//!
//! A gap is a pair of consecutive source samples further apart than the
//! configured tolerance. Grid points strictly inside a gap are excluded from
//! the output (see `build_grid_excluding`); the bounding samples themselves
//! are real and stay.

use crate::error::ResampleError;
use crate::grid::GRID_EPSILON;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Open interval of source time with no usable data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapSpan {
    /// Timestamp of the sample before the gap
    pub start: f64,
    /// Timestamp of the sample after the gap
    pub end: f64,
}

impl GapSpan {
    /// Gap length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `t` lies strictly inside the gap (endpoints excluded, with tolerance)
    pub fn contains(&self, t: f64) -> bool {
        t > self.start + GRID_EPSILON && t < self.end - GRID_EPSILON
    }
}

/// Gap detection over sorted source timestamps
#[derive(Debug, Clone, Copy)]
pub struct GapPolicy {
    max_gap_seconds: f64,
}

impl GapPolicy {
    /// Create a policy; the threshold must be positive and finite
    pub fn new(max_gap_seconds: f64) -> Result<Self, ResampleError> {
        if !max_gap_seconds.is_finite() || max_gap_seconds <= 0.0 {
            return Err(ResampleError::InvalidGapThreshold(max_gap_seconds));
        }
        Ok(Self { max_gap_seconds })
    }

    /// Configured threshold
    pub fn max_gap_seconds(&self) -> f64 {
        self.max_gap_seconds
    }

    /// Find every consecutive pair of sorted timestamps whose delta exceeds the threshold
    pub fn detect(&self, times: &[f64]) -> Vec<GapSpan> {
        let spans: Vec<GapSpan> = times
            .windows(2)
            .filter(|w| w[1] - w[0] > self.max_gap_seconds)
            .map(|w| GapSpan {
                start: w[0],
                end: w[1],
            })
            .collect();

        if !spans.is_empty() {
            debug!(
                "Detected {} gap(s) longer than {}s",
                spans.len(),
                self.max_gap_seconds
            );
        }
        spans
    }
}

impl Default for GapPolicy {
    fn default() -> Self {
        Self {
            max_gap_seconds: crate::DEFAULT_MAX_GAP_SECONDS,
        }
    }
}
