//! Genesis Block Creation
//!
//! Genesis anchors the chain. It has no transactions, the all-zero parent
//! sentinel and nonce 0, and is sealed by hash without proof-of-work.

use chrono::{DateTime, SubsecRound, Utc};
use shared_types::BlockHash;

use super::entities::Block;
use crate::error::IntegrityViolation;
use crate::utils::hashing::compute_hash;

/// Creates the genesis block at the given time
pub fn create_genesis_block(timestamp: DateTime<Utc>) -> Block {
    let timestamp = timestamp.trunc_subsecs(0);
    let hash = compute_hash(0, &timestamp, &[], &BlockHash::ZERO, 0);

    Block {
        index: 0,
        timestamp,
        transactions: Vec::new(),
        previous_hash: BlockHash::ZERO,
        nonce: 0,
        hash,
    }
}

/// Check the structural rules of a genesis block
///
/// The hash itself is verified by the general integrity pass.
pub fn check_genesis(block: &Block) -> Result<(), IntegrityViolation> {
    if block.index != 0 {
        return Err(IntegrityViolation::IndexMismatch {
            expected: 0,
            found: block.index,
        });
    }
    if block.previous_hash != BlockHash::ZERO {
        return Err(IntegrityViolation::InvalidGenesis {
            reason: format!("parent must be the zero sentinel, found {}", block.previous_hash),
        });
    }
    if !block.transactions.is_empty() {
        return Err(IntegrityViolation::InvalidGenesis {
            reason: format!("expected no transactions, found {}", block.transactions.len()),
        });
    }
    Ok(())
}
