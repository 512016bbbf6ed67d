//! Domain entities for the ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{BlockHash, Transaction};

use crate::utils::hashing::{compute_hash, meets_difficulty};

/// An ordered batch of transactions plus linkage and integrity metadata
///
/// Serialized as `{index, timestamp, transactions, previous_hash, nonce, hash}`,
/// the shape consumed by the dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain (0 = genesis)
    pub index: u64,

    /// Block creation time, whole seconds, ISO-8601
    #[serde(with = "shared_types::time::utc_seconds")]
    pub timestamp: DateTime<Utc>,

    /// Committed transactions; order is part of the block's identity
    pub transactions: Vec<Transaction>,

    /// Hash of the prior block ([`BlockHash::ZERO`] for genesis)
    pub previous_hash: BlockHash,

    /// Proof-of-work nonce
    pub nonce: u64,

    /// Digest of all the fields above
    pub hash: BlockHash,
}

impl Block {
    /// Recompute the digest from the stored fields
    pub fn recompute_hash(&self) -> BlockHash {
        compute_hash(
            self.index,
            &self.timestamp,
            &self.transactions,
            &self.previous_hash,
            self.nonce,
        )
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Check the stored hash against recomputation and the difficulty
    ///
    /// Genesis is sealed but not mined, so only its hash is checked.
    pub fn verify(&self, difficulty: u32) -> bool {
        if self.recompute_hash() != self.hash {
            return false;
        }
        self.is_genesis() || meets_difficulty(&self.hash, difficulty)
    }
}

/// Result of a successful nonce search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinedSeal {
    /// Lowest nonce satisfying the difficulty
    pub nonce: u64,

    /// Block digest with that nonce
    pub hash: BlockHash,

    /// Nonces tried (`nonce + 1`)
    pub attempts: u64,
}
