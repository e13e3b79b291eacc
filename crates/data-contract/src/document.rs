//! Contract document as stored in `data_contract.yaml`

use crate::error::ContractError;
use crate::settings::{parse_wrap_behavior, StandardizationConfig, REQUIRED_COLUMNS};
use config::{Config, File, FileFormat};
use data_validator::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use telemetry_resample::{
    ResampleConfig, WrapBehavior, DEFAULT_MAX_GAP_SECONDS, DEFAULT_RATE_HZ,
};
use tracing::{debug, info, warn};

/// Top-level contract document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataContract {
    #[serde(default)]
    pub contract_version: Option<String>,
    #[serde(default)]
    pub global_meta: GlobalMeta,
    #[serde(default)]
    pub standardization_policy: StandardizationPolicy,
    #[serde(default)]
    pub fields: Vec<ContractField>,
    #[serde(default)]
    pub conformance: Conformance,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalMeta {
    #[serde(default)]
    pub coordinate_reference_system: Option<String>,
    #[serde(default)]
    pub time_basis: Option<String>,
    #[serde(default)]
    pub sampling_rate_hz: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardizationPolicy {
    #[serde(default)]
    pub resample: ResamplePolicy,
    #[serde(default)]
    pub coordinates: CoordinatePolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResamplePolicy {
    #[serde(default)]
    pub target_rate_hz: Option<u32>,
    #[serde(default)]
    pub fill: FillPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FillPolicy {
    #[serde(default)]
    pub max_gap_seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinatePolicy {
    #[serde(default)]
    pub lat_range: Option<(f64, f64)>,
    #[serde(default)]
    pub lon_range: Option<(f64, f64)>,
}

/// Per-field entry of the contract
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractField {
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub constraints: FieldConstraints,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldConstraints {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub wrap_behavior: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conformance {
    #[serde(default)]
    pub file_requirements: FileRequirements,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileRequirements {
    #[serde(default)]
    pub must_have_columns: Vec<String>,
}

impl DataContract {
    /// Load a contract YAML file
    pub fn load(path: &Path) -> Result<Self, ContractError> {
        info!("Loading data contract from {}", path.display());
        let contract = Config::builder()
            .add_source(File::from(path).format(FileFormat::Yaml))
            .build()?
            .try_deserialize::<DataContract>()?;
        debug!("Contract version: {:?}", contract.contract_version);
        Ok(contract)
    }

    /// Parse contract YAML from a string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ContractError> {
        let contract = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize::<DataContract>()?;
        Ok(contract)
    }

    /// Look up a field entry by name
    pub fn field(&self, name: &str) -> Option<&ContractField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Map the document onto the settings consumed by the standardizer.
    ///
    /// Absent values fall back to the frozen contract defaults.
    pub fn to_standardization_config(&self) -> Result<StandardizationConfig, ContractError> {
        let policy = &self.standardization_policy;

        let rate_hz = match (policy.resample.target_rate_hz, self.global_meta.sampling_rate_hz) {
            (Some(target), Some(global)) if target != global => {
                return Err(ContractError::Invalid(format!(
                    "target_rate_hz {target} disagrees with sampling_rate_hz {global}"
                )));
            }
            (Some(rate), _) | (None, Some(rate)) => rate,
            (None, None) => DEFAULT_RATE_HZ,
        };

        let heading_wrap = match self
            .field("heading")
            .and_then(|f| f.constraints.wrap_behavior.as_deref())
        {
            Some(value) => parse_wrap_behavior(value)?,
            None => WrapBehavior::Mod360,
        };

        let resample = ResampleConfig {
            rate_hz,
            max_gap_seconds: policy
                .resample
                .fill
                .max_gap_seconds
                .unwrap_or(DEFAULT_MAX_GAP_SECONDS),
            heading_wrap,
        };

        let defaults = ValidationConfig::default();
        let validation = ValidationConfig {
            lat_range: policy.coordinates.lat_range.unwrap_or(defaults.lat_range),
            lon_range: policy.coordinates.lon_range.unwrap_or(defaults.lon_range),
            speed_min: self
                .field("speed")
                .and_then(|f| f.constraints.min)
                .unwrap_or(defaults.speed_min),
        };

        let required_columns = if self.conformance.file_requirements.must_have_columns.is_empty() {
            warn!("Contract lists no required columns, using engine defaults");
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
        } else {
            self.conformance.file_requirements.must_have_columns.clone()
        };

        let config = StandardizationConfig {
            resample,
            validation,
            required_columns,
        };
        config.validate()?;

        info!(
            "Contract settings: {} Hz, max gap {}s, {} required columns",
            config.resample.rate_hz,
            config.resample.max_gap_seconds,
            config.required_columns.len()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FROZEN_CONTRACT: &str = r#"conformance:
  dataset_quality_gates:
    no_future_leakage: true
    valid_rows_ratio_min: 0.95
  file_requirements:
    must_have_columns:
    - timestamp
    - lat
    - lon
    - speed
    - accel
    - heading
contract_version: '1.0'
fields:
- constraints:
    finite: true
    monotonic_non_decreasing: true
  description: Monotonic vehicle timestamp in UTC seconds.
  name: timestamp
  type: float
  unit: seconds_since_epoch
- constraints:
    finite: true
    min: 0.0
  description: Instantaneous vehicle speed.
  name: speed
  type: float
  unit: m/s
- constraints:
    finite: true
    range:
    - 0.0
    - 360.0
    wrap_behavior: mod_360
  description: 'Vehicle heading angle in [0, 360).'
  name: heading
  type: float
  unit: degrees
frozen_at_utc: '2025-01-01T00:00:00+00:00'
global_meta:
  coordinate_reference_system: EPSG:4326
  sampling_rate_hz: 10
  time_basis: UTC
standardization_policy:
  coordinates:
    crs_mandatory: EPSG:4326
    lat_range:
    - -90.0
    - 90.0
    lon_range:
    - -180.0
    - 180.0
  resample:
    fill:
      max_gap_seconds: 2
    interpolation:
      categorical: ffill
      numeric: linear
    method: time_index_uniform
    target_rate_hz: 10
"#;

    #[test]
    fn test_frozen_contract_maps_to_defaults() {
        let contract = DataContract::from_yaml_str(FROZEN_CONTRACT).unwrap();
        assert_eq!(contract.contract_version.as_deref(), Some("1.0"));
        assert_eq!(
            contract.global_meta.coordinate_reference_system.as_deref(),
            Some("EPSG:4326")
        );

        let config = contract.to_standardization_config().unwrap();
        assert_eq!(config, StandardizationConfig::default());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let contract = DataContract::from_yaml_str("contract_version: '1.0'\n").unwrap();
        let config = contract.to_standardization_config().unwrap();
        assert_eq!(config, StandardizationConfig::default());
    }

    #[test]
    fn test_custom_gap_and_rate() {
        let yaml = "standardization_policy:\n  resample:\n    target_rate_hz: 20\n    fill:\n      max_gap_seconds: 0.5\n";
        let config = DataContract::from_yaml_str(yaml)
            .unwrap()
            .to_standardization_config()
            .unwrap();
        assert_eq!(config.resample.rate_hz, 20);
        assert_eq!(config.resample.max_gap_seconds, 0.5);
    }

    #[test]
    fn test_conflicting_rates_rejected() {
        let yaml = "global_meta:\n  sampling_rate_hz: 5\nstandardization_policy:\n  resample:\n    target_rate_hz: 10\n";
        let contract = DataContract::from_yaml_str(yaml).unwrap();
        assert!(matches!(
            contract.to_standardization_config(),
            Err(ContractError::Invalid(_))
        ));
    }

    #[test]
    fn test_dropped_required_column_rejected() {
        let yaml = "conformance:\n  file_requirements:\n    must_have_columns: [timestamp, lat, lon, speed, heading]\n";
        let contract = DataContract::from_yaml_str(yaml).unwrap();
        assert!(matches!(
            contract.to_standardization_config(),
            Err(ContractError::MissingRequiredColumn(c)) if c == "accel"
        ));
    }

    #[test]
    fn test_unknown_wrap_behavior_rejected() {
        let yaml = "fields:\n- name: heading\n  constraints:\n    wrap_behavior: clamp\n";
        let contract = DataContract::from_yaml_str(yaml).unwrap();
        assert!(contract.to_standardization_config().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("contract-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("data_contract.yaml");
        std::fs::write(&path, FROZEN_CONTRACT).unwrap();

        let contract = DataContract::load(&path).unwrap();
        assert!(contract.field("heading").is_some());
        assert!(DataContract::load(&dir.join("absent.yaml")).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
