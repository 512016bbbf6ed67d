//! Domain layer - Pure provenance logic
//!
//! ## Entities
//!
//! - [`Product`]: Item with status, holder and custody history
//! - [`History`]: Append-only, read-only log of custody entries
//! - [`CustodyEdge`]: One handoff between consecutive holders
//!
//! ## Services
//!
//! - [`ProvenanceTracker`]: Product registry enforcing the lifecycle table

pub mod entities;
pub mod errors;
pub mod tracker;

pub use entities::{CustodyEdge, History, Product};
pub use errors::ProvenanceError;
pub use tracker::ProvenanceTracker;
