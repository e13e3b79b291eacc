//! Telemetry Resampling Engine
//!
//! Projects irregularly sampled vehicle telemetry onto a uniform time grid:
//! - Heading unwrap/wrap for circular interpolation
//! - Uniform grid construction at the contract rate
//! - Piecewise-linear field interpolation with boundary clamping
//! - Exclusion of grid points inside sampling gaps

mod angular;
mod error;
mod gap;
mod grid;
mod interpolator;
mod resampler;

pub use angular::{unwrap_degrees, wrap_degrees, WrapBehavior};
pub use error::ResampleError;
pub use gap::{GapPolicy, GapSpan};
pub use grid::{build_grid, build_grid_excluding, GridWalk, GRID_EPSILON};
pub use interpolator::interpolate;
pub use resampler::{resample_series, ResampleOutput};

use serde::{Deserialize, Serialize};

/// Contract sampling rate (Hz)
pub const DEFAULT_RATE_HZ: u32 = 10;

/// Contract gap tolerance (seconds)
pub const DEFAULT_MAX_GAP_SECONDS: f64 = 2.0;

/// One telemetry observation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Seconds since epoch
    pub timestamp: f64,
    /// WGS-84 latitude (degrees)
    pub lat: f64,
    /// WGS-84 longitude (degrees)
    pub lon: f64,
    /// Speed (m/s)
    pub speed: f64,
    /// Longitudinal acceleration (m/s^2)
    pub accel: f64,
    /// Heading (degrees, circular)
    pub heading: f64,
}

/// Sampling parameters taken from the data contract
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResampleConfig {
    /// Target rate of the uniform grid
    pub rate_hz: u32,
    /// Source gaps longer than this are not interpolated across
    pub max_gap_seconds: f64,
    /// Heading wrap applied after interpolation
    #[serde(default)]
    pub heading_wrap: WrapBehavior,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            rate_hz: DEFAULT_RATE_HZ,
            max_gap_seconds: DEFAULT_MAX_GAP_SECONDS,
            heading_wrap: WrapBehavior::Mod360,
        }
    }
}

impl ResampleConfig {
    /// Check that the parameters describe a usable grid and gap policy
    pub fn validate(&self) -> Result<(), ResampleError> {
        if self.rate_hz == 0 {
            return Err(ResampleError::InvalidRate(self.rate_hz));
        }
        if !self.max_gap_seconds.is_finite() || self.max_gap_seconds <= 0.0 {
            return Err(ResampleError::InvalidGapThreshold(self.max_gap_seconds));
        }
        Ok(())
    }

    /// Grid step in seconds
    pub fn step_seconds(&self) -> f64 {
        1.0 / self.rate_hz as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_contract() {
        let config = ResampleConfig::default();
        assert_eq!(config.rate_hz, 10);
        assert_eq!(config.max_gap_seconds, 2.0);
        assert_eq!(config.heading_wrap, WrapBehavior::Mod360);
        assert!(config.validate().is_ok());
        assert!((config.step_seconds() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config() {
        let zero_rate = ResampleConfig { rate_hz: 0, ..Default::default() };
        assert!(matches!(zero_rate.validate(), Err(ResampleError::InvalidRate(0))));

        let bad_gap = ResampleConfig { max_gap_seconds: -1.0, ..Default::default() };
        assert!(bad_gap.validate().is_err());

        let nan_gap = ResampleConfig { max_gap_seconds: f64::NAN, ..Default::default() };
        assert!(nan_gap.validate().is_err());
    }
}
