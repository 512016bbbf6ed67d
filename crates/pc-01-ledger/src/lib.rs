//! # Provenance Chain - Ledger (Subsystem 01)
//!
//! **Bounded Context:** Block sealing & chain integrity
//!
//! ## Purpose
//!
//! An append-only chain of blocks, each committing an ordered batch of
//! supply-chain transactions. Every block is linked to its parent by hash
//! and sealed with a bounded proof-of-work search, so any edit to a
//! committed block is detected by [`Ledger::validate`].
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Ledger (Outer)                                     │
//! │  - append / validate / import / snapshot            │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - Outbound: TimeSource                             │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - Block, genesis                                   │
//! │  - PoWMiner (sequential + interleaved parallel)     │
//! │  - Invariants: index, link, hash, difficulty        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use pc_01_ledger::{Ledger, LedgerConfig};
//! use shared_types::{ActorId, ProductId, Transaction};
//!
//! let mut ledger = Ledger::new(LedgerConfig::with_difficulty(4));
//! let tx = Transaction::created(
//!     ProductId::new("PRD-0001").unwrap(),
//!     "Supplier_1",
//!     ActorId::new("Supplier_1").unwrap(),
//!     chrono::Utc::now().naive_utc(),
//! )
//! .unwrap();
//!
//! ledger.append(vec![tx]).unwrap();
//! assert_eq!(ledger.len(), 2);
//! assert!(ledger.is_valid());
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod error;
mod ledger;
pub mod metrics;
pub mod ports;
pub mod utils;

pub use config::{LedgerConfig, MiningConfig};
pub use domain::{create_genesis_block, validate_blocks, Block, MinedSeal, PoWMiner};
pub use error::{ChainIntegrityError, IntegrityViolation, LedgerError, Result};
pub use ledger::Ledger;
pub use metrics::{LedgerMetrics, MetricsSnapshot};
pub use ports::{SteppingTimeSource, SystemTimeSource, TimeSource};
pub use utils::{compute_hash, meets_difficulty};

/// Default leading zero bits required of each mined block
pub const DEFAULT_DIFFICULTY: u32 = 8;

/// Default nonce search bound per block
pub const DEFAULT_MAX_ATTEMPTS: u64 = 5_000_000;
