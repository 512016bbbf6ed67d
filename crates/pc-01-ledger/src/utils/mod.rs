//! Utility modules for the ledger

pub mod hashing;

pub use hashing::{compute_hash, meets_difficulty};
