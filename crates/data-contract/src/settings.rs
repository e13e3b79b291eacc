//! Standardization settings passed explicitly into the orchestrator

use crate::error::ContractError;
use data_validator::ValidationConfig;
use serde::{Deserialize, Serialize};
pub use telemetry_resample::WrapBehavior;
use telemetry_resample::ResampleConfig;

/// Columns every input file must carry, in output order
pub const REQUIRED_COLUMNS: [&str; 6] = ["timestamp", "lat", "lon", "speed", "accel", "heading"];

/// Parse the contract spelling of a heading wrap behavior
pub fn parse_wrap_behavior(value: &str) -> Result<WrapBehavior, ContractError> {
    match value.trim() {
        "mod_360" => Ok(WrapBehavior::Mod360),
        other => Err(ContractError::Invalid(format!(
            "unsupported heading wrap behavior: {other}"
        ))),
    }
}

/// Everything the standardizer needs from the contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizationConfig {
    /// Grid rate and gap tolerance
    pub resample: ResampleConfig,
    /// Row value constraints
    pub validation: ValidationConfig,
    /// Columns an input file must provide
    pub required_columns: Vec<String>,
}

impl Default for StandardizationConfig {
    fn default() -> Self {
        Self {
            resample: ResampleConfig::default(),
            validation: ValidationConfig::default(),
            required_columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl StandardizationConfig {
    /// Replace the grid rate
    pub fn with_rate_hz(mut self, rate_hz: u32) -> Self {
        self.resample.rate_hz = rate_hz;
        self
    }

    /// Replace the gap tolerance
    pub fn with_max_gap_seconds(mut self, max_gap_seconds: f64) -> Self {
        self.resample.max_gap_seconds = max_gap_seconds;
        self
    }

    /// Apply command-line overrides on top of the contract values
    pub fn with_overrides(self, rate_hz: Option<u32>, max_gap_seconds: Option<f64>) -> Self {
        let config = match rate_hz {
            Some(rate) => self.with_rate_hz(rate),
            None => self,
        };
        match max_gap_seconds {
            Some(gap) => config.with_max_gap_seconds(gap),
            None => config,
        }
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ContractError> {
        self.resample
            .validate()
            .map_err(|e| ContractError::Invalid(e.to_string()))?;

        for column in REQUIRED_COLUMNS {
            if !self.required_columns.iter().any(|c| c == column) {
                return Err(ContractError::MissingRequiredColumn(column.to_string()));
            }
        }

        let (lat_min, lat_max) = self.validation.lat_range;
        let (lon_min, lon_max) = self.validation.lon_range;
        if lat_min > lat_max || lon_min > lon_max {
            return Err(ContractError::Invalid(
                "coordinate range minimum exceeds maximum".to_string(),
            ));
        }
        Ok(())
    }
}
