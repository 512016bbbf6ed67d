//! # Ledger
//!
//! The append-only chain of sealed blocks. The block list is private: the
//! only ways to extend it are [`Ledger::append`] and importing a chain that
//! validates ([`Ledger::from_blocks`]). Readers get shared slices or owned
//! copies, never `&mut Block`.


use crate::config::LedgerConfig;
use crate::domain::{create_genesis_block, validate_blocks, Block, PoWMiner};
use crate::error::{ChainIntegrityError, LedgerError, Result};
use crate::metrics::LedgerMetrics;
use crate::ports::outbound::{SystemTimeSource, TimeSource};
use chrono::SubsecRound;
use shared_types::{Transaction, ValidationError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Tamper-evident chain of proof-of-work blocks
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    config: LedgerConfig,
    miner: PoWMiner,
    clock: Arc<dyn TimeSource>,
    metrics: LedgerMetrics,
}

impl Ledger {
    /// Create a ledger holding only the genesis block, on the system clock
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    /// Create a ledger with an injected clock
    ///
    /// The genesis block is sealed by its hash but not mined: it carries
    /// nonce 0 and is exempt from the difficulty predicate, which binds
    /// every later block. Construction therefore never fails, even for an
    /// unreachable difficulty.
    pub fn with_time_source(config: LedgerConfig, clock: Arc<dyn TimeSource>) -> Self {
        let genesis_time = config.genesis_timestamp.unwrap_or_else(|| clock.now());
        let genesis = create_genesis_block(genesis_time);

        info!(
            "[pc-01] Ledger initialized: difficulty={}, genesis={}",
            config.difficulty, genesis.hash
        );

        Self {
            chain: vec![genesis],
            miner: PoWMiner::new(&config.mining),
            config,
            clock,
            metrics: LedgerMetrics::new(),
        }
    }

    /// Import an exported chain, accepted only if it validates
    pub fn from_blocks(blocks: Vec<Block>, config: LedgerConfig) -> Result<Self> {
        validate_blocks(&blocks, config.difficulty)?;

        info!(
            "[pc-01] Imported chain: blocks={}, difficulty={}",
            blocks.len(),
            config.difficulty
        );

        Ok(Self {
            chain: blocks,
            miner: PoWMiner::new(&config.mining),
            config,
            clock: Arc::new(SystemTimeSource),
            metrics: LedgerMetrics::new(),
        })
    }

    /// Mine a block over `transactions` and link it to the head
    ///
    /// The chain is unchanged on every error path.
    #[tracing::instrument(skip(self, transactions), fields(index = self.chain.len(), tx_count = transactions.len()))]
    pub fn append(&mut self, transactions: Vec<Transaction>) -> Result<&Block> {
        if transactions.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }

        let head = self.head();
        let index = head.index + 1;
        let previous_hash = head.hash;
        // Block time never precedes its parent
        let timestamp = self.clock.now().trunc_subsecs(0).max(head.timestamp);

        let started = Instant::now();
        let mined = self.miner.mine(
            index,
            &timestamp,
            &transactions,
            &previous_hash,
            self.config.difficulty,
        );
        self.metrics
            .record_mining_time(started.elapsed().as_millis() as u64);

        let seal = match mined {
            Ok(seal) => seal,
            Err(err) => {
                if let LedgerError::MiningTimeout { attempts, .. } = err {
                    self.metrics.record_mining_failure(attempts);
                }
                warn!("[pc-01] Append rejected: {}", err);
                return Err(err);
            }
        };

        self.metrics
            .record_block_mined(transactions.len(), seal.attempts);
        debug!(
            "[pc-01] Block {} sealed: nonce={}, hash={}",
            index, seal.nonce, seal.hash
        );

        self.chain.push(Block {
            index,
            timestamp,
            transactions,
            previous_hash,
            nonce: seal.nonce,
            hash: seal.hash,
        });
        Ok(self.head())
    }

    /// Walk the chain from genesis, reporting the first broken block
    pub fn validate(&self) -> std::result::Result<(), ChainIntegrityError> {
        validate_blocks(&self.chain, self.config.difficulty)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// All blocks, genesis first
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Most recently appended block (genesis when nothing was appended)
    pub fn head(&self) -> &Block {
        // The chain always holds genesis
        &self.chain[self.chain.len() - 1]
    }

    /// Number of blocks including genesis
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.config.difficulty
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Total transactions across all blocks
    pub fn transaction_count(&self) -> usize {
        self.chain.iter().map(|b| b.transactions.len()).sum()
    }

    /// Owned copy of the chain for export
    pub fn snapshot(&self) -> Vec<Block> {
        self.chain.clone()
    }

    pub fn metrics(&self) -> &LedgerMetrics {
        &self.metrics
    }
}
