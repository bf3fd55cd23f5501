//! Configuration types for the ledger

use crate::error::{LedgerError, Result};
use serde::Deserialize;

/// Runtime configuration for a ledger instance
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Leading hex zeros required of every record digest
    pub difficulty: u32,

    /// Payload sealed into the genesis record
    pub genesis_payload: String,

    /// Override for the sealing attempt ceiling (default scales with difficulty)
    pub max_attempts: Option<u64>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: crate::DEFAULT_DIFFICULTY,
            genesis_payload: crate::DEFAULT_GENESIS_PAYLOAD.to_string(),
            max_attempts: None,
        }
    }
}

impl LedgerConfig {
    /// Config with the given difficulty and defaults elsewhere
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Reject values no ledger can be built from
    pub fn validate(&self) -> Result<()> {
        crate::domain::ensure_difficulty(self.difficulty)?;
        if self.genesis_payload.is_empty() {
            return Err(LedgerError::InvalidConfig(
                "genesis payload must be non-empty".to_string(),
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(LedgerError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default attempt ceiling for a proof-of-work search
///
/// `max(10_000_000, difficulty * 5_000_000)`
pub fn default_max_attempts(difficulty: u32) -> u64 {
    (difficulty as u64)
        .saturating_mul(crate::ATTEMPTS_PER_DIFFICULTY)
        .max(crate::MIN_MAX_ATTEMPTS)
}
