//! Configuration types for the ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::ValidationError;

/// Runtime configuration for the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Required leading zero bits of every non-genesis block hash
    ///
    /// Values above 256 are accepted and can never be satisfied; appends
    /// then fail with a mining timeout.
    pub difficulty: u32,

    /// Nonce search settings
    pub mining: MiningConfig,

    /// Fixed genesis timestamp (default: the clock at construction)
    pub genesis_timestamp: Option<DateTime<Utc>>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: crate::DEFAULT_DIFFICULTY,
            mining: MiningConfig::default(),
            genesis_timestamp: None,
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

    /// Reject settings that make mining meaningless
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.mining.validate()
    }
}

/// PoW nonce search configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Hard upper bound on nonces tried per block (default: 5_000_000)
    pub max_attempts: u64,

    /// Number of search threads (default: 1, 0 = one per CPU)
    ///
    /// The result is the lowest valid nonce regardless of thread count.
    pub threads: usize,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            max_attempts: crate::DEFAULT_MAX_ATTEMPTS,
            threads: 1,
        }
    }
}

impl MiningConfig {
    /// Reject a zero attempt bound
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::out_of_range(
                "mining.max_attempts",
                self.max_attempts,
                ">= 1",
            ));
        }
        Ok(())
    }

    /// Thread count with `0` resolved to the CPU count
    pub fn effective_threads(&self) -> usize {
        match self.threads {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }
}
