//! # Provenance Chain - Product Provenance (Subsystem 02)
//!
//! ## Purpose
//!
//! Tracks each product's lifecycle status, current holder and chain of
//! custody, and turns every accepted status change into exactly one ledger
//! [`Transaction`](shared_types::Transaction).
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Status moves only to its successor | `domain/tracker` - `apply()` |
//! | `status`/`current_holder` equal the latest history entry | `domain/entities.rs` - `Product::advance()` |
//! | History non-empty and non-decreasing in time | `domain/entities.rs` - `History` |
//! | No mutable access to history elements | `History` exposes `&HistoryEntry` only |
//!
//! ## Module Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/tracker   - ProvenanceTracker (registry + lifecycle)    │
//! │  domain/entities  - Product, History, CustodyEdge               │
//! │  domain/errors    - ProvenanceError                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]

pub mod domain;

pub use domain::{CustodyEdge, History, Product, ProvenanceError, ProvenanceTracker};
