//! Error types for the ledger

use shared_types::ValidationError;
use std::fmt;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while extending or loading the ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Nonce search exhausted its attempt bound
    #[error(
        "Mining timeout for block {index}: no nonce meeting difficulty {difficulty} within {attempts} attempts"
    )]
    MiningTimeout {
        /// Index of the block that could not be sealed
        index: u64,
        /// Required leading zero bits
        difficulty: u32,
        /// Attempts made before giving up
        attempts: u64,
    },

    /// The chain failed validation
    #[error(transparent)]
    ChainIntegrity(#[from] ChainIntegrityError),

    /// Malformed input rejected before any mutation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl LedgerError {
    /// Check if error is fatal for the current run
    ///
    /// Mining timeouts and integrity failures both terminate a simulation;
    /// validation errors only reject the offending call.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MiningTimeout { .. } | Self::ChainIntegrity(_))
    }
}

/// Validation found a block that breaks a chain invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Chain integrity violated at block {index}: {violation}")]
pub struct ChainIntegrityError {
    /// Index (position) of the first offending block
    pub index: u64,
    /// Which invariant was broken
    pub violation: IntegrityViolation,
}

impl ChainIntegrityError {
    pub(crate) fn new(index: u64, violation: IntegrityViolation) -> Self {
        Self { index, violation }
    }
}

/// The invariant a block violated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// The chain has no blocks at all
    MissingGenesis,
    /// Block 0 does not carry the sentinel parent or has transactions
    InvalidGenesis {
        /// What is wrong with it
        reason: String,
    },
    /// `index` does not equal the block's position
    IndexMismatch {
        /// Position in the chain
        expected: u64,
        /// Stored index
        found: u64,
    },
    /// `previous_hash` does not equal the prior block's `hash`
    BrokenLink,
    /// Stored hash differs from recomputation
    HashMismatch,
    /// Hash lacks the required leading zero bits
    DifficultyNotMet {
        /// Required leading zero bits
        required: u32,
        /// Leading zero bits of the stored hash
        actual: u32,
    },
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityViolation::MissingGenesis => write!(f, "chain has no genesis block"),
            IntegrityViolation::InvalidGenesis { reason } => {
                write!(f, "invalid genesis block: {}", reason)
            }
            IntegrityViolation::IndexMismatch { expected, found } => {
                write!(f, "index mismatch: expected {}, found {}", expected, found)
            }
            IntegrityViolation::BrokenLink => {
                write!(f, "previous_hash does not match the prior block's hash")
            }
            IntegrityViolation::HashMismatch => {
                write!(f, "stored hash does not match recomputed hash")
            }
            IntegrityViolation::DifficultyNotMet { required, actual } => write!(
                f,
                "hash has {} leading zero bits, difficulty requires {}",
                actual, required
            ),
        }
    }
}
