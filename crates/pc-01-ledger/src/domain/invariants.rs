//! Invariant checkers for the chain
//!
//! Every block must satisfy these in order; validation stops at the first
//! block that does not.

use super::entities::Block;
use super::genesis::check_genesis;
use crate::error::{ChainIntegrityError, IntegrityViolation};
use crate::utils::hashing::{leading_zero_bits, meets_difficulty};

/// Stored index equals position in the chain
pub fn check_index(block: &Block, position: u64) -> Result<(), IntegrityViolation> {
    if block.index != position {
        return Err(IntegrityViolation::IndexMismatch {
            expected: position,
            found: block.index,
        });
    }
    Ok(())
}

/// Block links to the hash of its predecessor
pub fn check_link(block: &Block, previous: &Block) -> Result<(), IntegrityViolation> {
    if block.previous_hash != previous.hash {
        return Err(IntegrityViolation::BrokenLink);
    }
    Ok(())
}

/// Stored hash equals recomputation over the stored fields
pub fn check_hash(block: &Block) -> Result<(), IntegrityViolation> {
    if block.recompute_hash() != block.hash {
        return Err(IntegrityViolation::HashMismatch);
    }
    Ok(())
}

/// Stored hash has at least `difficulty` leading zero bits
pub fn check_difficulty(block: &Block, difficulty: u32) -> Result<(), IntegrityViolation> {
    if !meets_difficulty(&block.hash, difficulty) {
        return Err(IntegrityViolation::DifficultyNotMet {
            required: difficulty,
            actual: leading_zero_bits(&block.hash),
        });
    }
    Ok(())
}

/// Validate a whole chain
///
/// Checks genesis structure, then for every block its index, its link to
/// the predecessor, its hash and (genesis excepted) its difficulty. Reports
/// the first offending block.
pub fn validate_blocks(blocks: &[Block], difficulty: u32) -> Result<(), ChainIntegrityError> {
    let genesis = blocks
        .first()
        .ok_or_else(|| ChainIntegrityError::new(0, IntegrityViolation::MissingGenesis))?;

    check_genesis(genesis)
        .and_then(|_| check_hash(genesis))
        .map_err(|violation| ChainIntegrityError::new(0, violation))?;

    for (position, pair) in blocks.windows(2).enumerate() {
        let (previous, block) = (&pair[0], &pair[1]);
        let position = position as u64 + 1;

        check_index(block, position)
            .and_then(|_| check_link(block, previous))
            .and_then(|_| check_hash(block))
            .and_then(|_| check_difficulty(block, difficulty))
            .map_err(|violation| ChainIntegrityError::new(position, violation))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::genesis::create_genesis_block;
    use crate::utils::hashing::compute_hash;
    use chrono::{DateTime, TimeZone, Utc};
    use shared_types::{ActorId, BlockHash, ProductId, Transaction};

    fn ts(sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, sec).unwrap()
    }

    fn created_tx(id: &str) -> Transaction {
        Transaction::created(
            ProductId::new(id).unwrap(),
            "Supplier_1",
            ActorId::new("Supplier_1").unwrap(),
            ts(0).naive_utc(),
        )
        .unwrap()
    }

    /// Seal a block by brute force at a small difficulty
    fn seal(index: u64, previous: &Block, txs: Vec<Transaction>, difficulty: u32) -> Block {
        let timestamp = ts(index as u32);
        let nonce = (0u64..)
            .find(|&n| {
                meets_difficulty(
                    &compute_hash(index, &timestamp, &txs, &previous.hash, n),
                    difficulty,
                )
            })
            .unwrap();
        Block {
            index,
            timestamp,
            hash: compute_hash(index, &timestamp, &txs, &previous.hash, nonce),
            transactions: txs,
            previous_hash: previous.hash,
            nonce,
        }
    }

    fn chain(difficulty: u32) -> Vec<Block> {
        let genesis = create_genesis_block(ts(0));
        let b1 = seal(1, &genesis, vec![created_tx("PRD-0001")], difficulty);
        let b2 = seal(2, &b1, vec![created_tx("PRD-0002")], difficulty);
        vec![genesis, b1, b2]
    }

    #[test]
    fn test_valid_chain_passes() {
        assert!(validate_blocks(&chain(4), 4).is_ok());
    }

    #[test]
    fn test_empty_chain_rejected() {
        let err = validate_blocks(&[], 4).unwrap_err();
        assert_eq!(err.violation, IntegrityViolation::MissingGenesis);
    }

    #[test]
    fn test_genesis_only_is_valid() {
        assert!(validate_blocks(&[create_genesis_block(ts(0))], 20).is_ok());
    }

    #[test]
    fn test_tampered_transaction_detected() {
        let mut blocks = chain(4);
        blocks[1].transactions[0] = created_tx("PRD-9999");
        let err = validate_blocks(&blocks, 4).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.violation, IntegrityViolation::HashMismatch);
    }

    #[test]
    fn test_rehashed_block_breaks_next_link() {
        let mut blocks = chain(4);
        blocks[1].nonce += 1;
        blocks[1].hash = blocks[1].recompute_hash();
        let err = validate_blocks(&blocks, 0).unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.violation, IntegrityViolation::BrokenLink);
    }

    #[test]
    fn test_index_mismatch_detected() {
        let mut blocks = chain(2);
        blocks[2].index = 5;
        let err = validate_blocks(&blocks, 2).unwrap_err();
        assert_eq!(
            err.violation,
            IntegrityViolation::IndexMismatch {
                expected: 2,
                found: 5
            }
        );
    }

    #[test]
    fn test_higher_difficulty_rejects_chain() {
        let blocks = chain(1);
        // A lowest-nonce seal at difficulty 1 rarely clears 40 bits
        let err = validate_blocks(&blocks, 40).unwrap_err();
        assert_eq!(err.index, 1);
        assert!(matches!(
            err.violation,
            IntegrityViolation::DifficultyNotMet { required: 40, .. }
        ));
    }

    #[test]
    fn test_genesis_with_transactions_rejected() {
        let mut blocks = chain(0);
        blocks[0].transactions.push(created_tx("PRD-0003"));
        blocks[0].hash = blocks[0].recompute_hash();
        let err = validate_blocks(&blocks, 0).unwrap_err();
        assert_eq!(err.index, 0);
        assert!(matches!(err.violation, IntegrityViolation::InvalidGenesis { .. }));
    }

    #[test]
    fn test_genesis_parent_sentinel_unchanged() {
        assert_eq!(chain(0)[0].previous_hash, BlockHash::ZERO);
    }
}
