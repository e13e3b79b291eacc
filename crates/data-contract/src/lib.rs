//! Data Contract
//!
//! Read-only access to the frozen data contract artifact:
//! - YAML document loading
//! - SHA-256 lock verification
//! - Mapping to the explicit settings consumed by the standardizer

mod document;
mod error;
mod lock;
mod settings;

pub use document::{
    Conformance, ContractField, CoordinatePolicy, DataContract, FieldConstraints, FillPolicy,
    GlobalMeta, ResamplePolicy, StandardizationPolicy,
};
pub use error::ContractError;
pub use lock::ContractLock;
pub use settings::{parse_wrap_behavior, StandardizationConfig, WrapBehavior, REQUIRED_COLUMNS};
