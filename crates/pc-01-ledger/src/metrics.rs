//! Metrics collection for the ledger

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for mining and appends
#[derive(Debug, Default)]
pub struct LedgerMetrics {
    /// Total blocks mined (genesis excluded)
    pub blocks_mined: AtomicU64,

    /// Total transactions committed
    pub transactions_committed: AtomicU64,

    /// Total nonces tried, successful or not
    pub hash_attempts: AtomicU64,

    /// Appends that hit the attempt bound
    pub mining_failures: AtomicU64,

    /// Total PoW mining time (milliseconds)
    pub mining_time_ms: AtomicU64,
}

impl LedgerMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed block
    pub fn record_block_mined(&self, tx_count: usize, attempts: u64) {
        self.blocks_mined.fetch_add(1, Ordering::Relaxed);
        self.transactions_committed
            .fetch_add(tx_count as u64, Ordering::Relaxed);
        self.hash_attempts.fetch_add(attempts, Ordering::Relaxed);
    }

    /// Record a nonce search that exhausted its bound
    pub fn record_mining_failure(&self, attempts: u64) {
        self.mining_failures.fetch_add(1, Ordering::Relaxed);
        self.hash_attempts.fetch_add(attempts, Ordering::Relaxed);
    }

    /// Record PoW mining time
    pub fn record_mining_time(&self, duration_ms: u64) {
        self.mining_time_ms.fetch_add(duration_ms, Ordering::Relaxed);
    }

    pub fn get_blocks_mined(&self) -> u64 {
        self.blocks_mined.load(Ordering::Relaxed)
    }

    pub fn get_transactions_committed(&self) -> u64 {
        self.transactions_committed.load(Ordering::Relaxed)
    }

    pub fn get_hash_attempts(&self) -> u64 {
        self.hash_attempts.load(Ordering::Relaxed)
    }

    pub fn get_mining_failures(&self) -> u64 {
        self.mining_failures.load(Ordering::Relaxed)
    }

    /// Get average nonces tried per mined block
    pub fn get_avg_attempts_per_block(&self) -> f64 {
        let blocks = self.blocks_mined.load(Ordering::Relaxed);
        if blocks == 0 {
            return 0.0;
        }
        let attempts = self.hash_attempts.load(Ordering::Relaxed);
        attempts as f64 / blocks as f64
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            blocks_mined: self.get_blocks_mined(),
            transactions_committed: self.get_transactions_committed(),
            hash_attempts: self.get_hash_attempts(),
            mining_failures: self.get_mining_failures(),
            mining_time_ms: self.mining_time_ms.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`LedgerMetrics`] for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub blocks_mined: u64,
    pub transactions_committed: u64,
    pub hash_attempts: u64,
    pub mining_failures: u64,
    pub mining_time_ms: u64,
}
