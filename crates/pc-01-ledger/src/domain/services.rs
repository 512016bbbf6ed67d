//! Domain services for the ledger

use super::entities::MinedSeal;
use crate::config::MiningConfig;
use crate::error::{LedgerError, Result};
use crate::utils::hashing::{hash_with_nonce, meets_difficulty, serialize_block_prefix};
use chrono::{DateTime, Utc};
use shared_types::{BlockHash, Transaction};
use std::sync::atomic::{AtomicU64, Ordering};

/// Bounded PoW nonce search service
///
/// Searches nonces upward from 0 and returns the lowest one whose block
/// digest meets the difficulty. With more than one thread the nonce space
/// is interleaved across threads; the answer is the same nonce the
/// sequential search would find.
#[derive(Clone, Debug)]
pub struct PoWMiner {
    /// Number of search threads (already resolved, >= 1)
    num_threads: usize,
    /// Nonces tried per block before giving up
    max_attempts: u64,
}

impl PoWMiner {
    /// Create new PoW miner from configuration
    pub fn new(config: &MiningConfig) -> Self {
        Self {
            num_threads: config.effective_threads(),
            max_attempts: config.max_attempts,
        }
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }

    /// Search for a valid nonce
    ///
    /// Fails with [`LedgerError::MiningTimeout`] once `max_attempts` nonces
    /// have been tried.
    #[tracing::instrument(
        skip(self, timestamp, transactions, previous_hash),
        fields(threads = self.num_threads, tx_count = transactions.len())
    )]
    pub fn mine(
        &self,
        index: u64,
        timestamp: &DateTime<Utc>,
        transactions: &[Transaction],
        previous_hash: &BlockHash,
        difficulty: u32,
    ) -> Result<MinedSeal> {
        let prefix = serialize_block_prefix(index, timestamp, transactions, previous_hash);

        tracing::debug!(
            "Starting PoW mining: block={}, difficulty={}, max_attempts={}",
            index,
            difficulty,
            self.max_attempts
        );

        let found = if self.num_threads <= 1 {
            Self::search_sequential(&prefix, difficulty, self.max_attempts)
        } else {
            Self::search_parallel(&prefix, difficulty, self.max_attempts, self.num_threads)
        };

        match found {
            Some(nonce) => {
                tracing::debug!("PoW mining successful: block={}, nonce={}", index, nonce);
                Ok(MinedSeal {
                    nonce,
                    hash: hash_with_nonce(&prefix, nonce),
                    attempts: nonce + 1,
                })
            }
            None => {
                tracing::warn!(
                    "PoW mining failed: block={}, no valid nonce in {} attempts",
                    index,
                    self.max_attempts
                );
                Err(LedgerError::MiningTimeout {
                    index,
                    difficulty,
                    attempts: self.max_attempts,
                })
            }
        }
    }

    fn search_sequential(prefix: &[u8], difficulty: u32, max_attempts: u64) -> Option<u64> {
        (0..max_attempts).find(|&nonce| meets_difficulty(&hash_with_nonce(prefix, nonce), difficulty))
    }

    /// Thread `t` of `T` tries `t, t+T, t+2T, …`; a shared minimum lets each
    /// thread stop once it can no longer beat the best nonce found so far.
    fn search_parallel(
        prefix: &[u8],
        difficulty: u32,
        max_attempts: u64,
        num_threads: usize,
    ) -> Option<u64> {
        let best = AtomicU64::new(u64::MAX);
        let stride = num_threads as u64;

        std::thread::scope(|scope| {
            for thread_id in 0..stride {
                let best = &best;
                scope.spawn(move || {
                    let mut nonce = thread_id;
                    while nonce < max_attempts {
                        if nonce > best.load(Ordering::Relaxed) {
                            break;
                        }
                        if meets_difficulty(&hash_with_nonce(prefix, nonce), difficulty) {
                            best.fetch_min(nonce, Ordering::Relaxed);
                            break;
                        }
                        nonce = match nonce.checked_add(stride) {
                            Some(next) => next,
                            None => break,
                        };
                    }
                });
            }
        });

        match best.into_inner() {
            u64::MAX => None,
            nonce => Some(nonce),
        }
    }
}
