//! # Shared Types Crate
//!
//! This crate contains the value types that cross crate boundaries: the
//! product lifecycle table, the tagged transaction schema, identifiers and
//! digests.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: The lifecycle table ([`ProductStatus::successor`])
//!   and the transaction schema ([`SupplyChainEvent`]) live side by side so
//!   they cannot drift apart.
//! - **Validate at Construction**: Identifiers, transactions and digests are
//!   checked when built or deserialized, never at use.
//! - **Immutable Records**: A [`Transaction`] exposes getters only.

pub mod entities;
pub mod errors;
pub mod time;
pub mod transaction;

pub use entities::*;
pub use errors::*;
pub use transaction::{SupplyChainEvent, Transaction};
