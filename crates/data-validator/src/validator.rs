//! Data Validator for Contract Range Checking

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use telemetry_resample::TelemetrySample;

/// Validation configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Latitude valid range (degrees)
    pub lat_range: (f64, f64),
    /// Longitude valid range (degrees)
    pub lon_range: (f64, f64),
    /// Minimum speed (m/s)
    pub speed_min: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            lat_range: (-90.0, 90.0),
            lon_range: (-180.0, 180.0),
            speed_min: 0.0,
        }
    }
}

/// Result of validating a batch of rows
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Rows that satisfied every constraint
    pub valid: Vec<TelemetrySample>,
    /// First error per rejected row
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Number of rejected rows
    pub fn rejected(&self) -> usize {
        self.errors.len()
    }
}

/// Contract validator for telemetry rows
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate latitude
    pub fn validate_lat(&self, lat: f64) -> Result<(), ValidationError> {
        self.validate_range("lat", lat, self.config.lat_range)
    }

    /// Validate longitude
    pub fn validate_lon(&self, lon: f64) -> Result<(), ValidationError> {
        self.validate_range("lon", lon, self.config.lon_range)
    }

    /// Validate speed
    pub fn validate_speed(&self, speed: f64) -> Result<(), ValidationError> {
        if speed < self.config.speed_min {
            Err(ValidationError::BelowMinimum {
                field: "speed",
                value: speed,
                min: self.config.speed_min,
            })
        } else {
            Ok(())
        }
    }

    /// Validate every field of a sample; heading is wrapped downstream so only finiteness applies
    pub fn validate_sample(&self, sample: &TelemetrySample) -> Result<(), ValidationError> {
        let fields = [
            ("timestamp", sample.timestamp),
            ("lat", sample.lat),
            ("lon", sample.lon),
            ("speed", sample.speed),
            ("accel", sample.accel),
            ("heading", sample.heading),
        ];
        if let Some((field, _)) = fields.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::NonFinite { field });
        }

        self.validate_lat(sample.lat)?;
        self.validate_lon(sample.lon)?;
        self.validate_speed(sample.speed)
    }

    /// Split rows into valid samples and per-row rejections
    pub fn validate_all(&self, samples: Vec<TelemetrySample>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for sample in samples {
            match self.validate_sample(&sample) {
                Ok(()) => result.valid.push(sample),
                Err(e) => result.errors.push(e),
            }
        }
        result
    }
}
