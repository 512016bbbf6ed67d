//! Domain layer - Pure ledger logic
//!
//! Block entities, genesis, the bounded nonce search and the chain
//! invariants. Nothing here reads the clock or does I/O.
//!
//! ## Invariants
//!
//! Every chain enforces:
//! 1. Genesis at index 0 with the zero parent and no transactions
//! 2. `index` equals position
//! 3. `previous_hash` equals the prior block's `hash`
//! 4. `hash` equals recomputation over the stored fields
//! 5. Non-genesis hashes meet the configured difficulty

mod entities;
pub mod genesis;
pub mod invariants;
mod services;

pub use entities::*;
pub use genesis::*;
pub use invariants::*;
pub use services::PoWMiner;
