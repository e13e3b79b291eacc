//! Contract lock verification

use crate::error::ContractError;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// SHA-256 lock over the exact contract text
pub struct ContractLock;

impl ContractLock {
    /// Hex SHA-256 digest of the contract text
    pub fn digest(text: &str) -> String {
        hex::encode(Sha256::digest(text.as_bytes()))
    }

    /// Check that `contract_path` hashes to the digest recorded in `lock_path`.
    ///
    /// Returns the verified digest.
    pub fn verify(contract_path: &Path, lock_path: &Path) -> Result<String, ContractError> {
        let content = fs::read_to_string(contract_path)?;
        let expected = fs::read_to_string(lock_path)?.trim().to_string();
        let actual = Self::digest(&content);

        if actual != expected {
            warn!("Contract lock mismatch for {}", contract_path.display());
            return Err(ContractError::LockMismatch { expected, actual });
        }

        info!("Lock matches contract yaml ({})", actual);
        Ok(actual)
    }
}
