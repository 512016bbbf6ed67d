//! Hashing utilities for the ledger
//!
//! Provides the canonical block preimage, the SHA-256d block digest and the
//! leading-zero-bits difficulty predicate.

use chrono::{DateTime, Utc};
use primitive_types::U256;
use sha2::{Digest, Sha256};
use shared_types::{BlockHash, Transaction};

/// Compute SHA-256 hash of data
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute double SHA-256 hash (Bitcoin-style)
///
/// Used for block digests to prevent length extension attacks
#[inline]
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    let first_hash = sha256(data);
    sha256(&first_hash)
}

/// Serialize every block field except the nonce
///
/// The miner serializes this prefix once per block and appends each
/// candidate nonce to it.
pub fn serialize_block_prefix(
    index: u64,
    timestamp: &DateTime<Utc>,
    transactions: &[Transaction],
    previous_hash: &BlockHash,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(64 + transactions.len() * 96);

    bytes.extend_from_slice(&index.to_le_bytes());
    bytes.extend_from_slice(&timestamp.timestamp().to_le_bytes());
    bytes.extend_from_slice(&timestamp.timestamp_subsec_nanos().to_le_bytes());
    bytes.extend_from_slice(previous_hash.as_bytes());
    bytes.extend_from_slice(&(transactions.len() as u64).to_le_bytes());

    for tx in transactions {
        let encoded = tx.canonical_bytes();
        bytes.extend_from_slice(&(encoded.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&encoded);
    }

    bytes
}

/// Hash a serialized prefix with a candidate nonce
#[inline]
pub fn hash_with_nonce(prefix: &[u8], nonce: u64) -> BlockHash {
    let mut preimage = Vec::with_capacity(prefix.len() + 8);
    preimage.extend_from_slice(prefix);
    preimage.extend_from_slice(&nonce.to_le_bytes());
    BlockHash::from_bytes(sha256d(&preimage))
}

/// Deterministic block digest over `(index, timestamp, transactions, previous_hash, nonce)`
pub fn compute_hash(
    index: u64,
    timestamp: &DateTime<Utc>,
    transactions: &[Transaction],
    previous_hash: &BlockHash,
    nonce: u64,
) -> BlockHash {
    let prefix = serialize_block_prefix(index, timestamp, transactions, previous_hash);
    hash_with_nonce(&prefix, nonce)
}

/// Number of leading zero bits of a digest read as a big-endian integer
#[inline]
pub fn leading_zero_bits(hash: &BlockHash) -> u32 {
    U256::from_big_endian(hash.as_bytes()).leading_zeros()
}

/// Check if hash meets difficulty
///
/// Returns true if the digest has at least `difficulty` leading zero bits.
/// Any difficulty above 256 is unsatisfiable.
#[inline]
pub fn meets_difficulty(hash: &BlockHash, difficulty: u32) -> bool {
    leading_zero_bits(hash) >= difficulty
}
