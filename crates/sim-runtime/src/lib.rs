//! # Simulation Runtime Library
//!
//! Drives synthetic products through the supply chain and commits every
//! event to the ledger. The `main.rs` binary wraps this with configuration
//! layering, logging and snapshot export.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sim_runtime::{run_simulation, SimulationSnapshot};
//!
//! let outcome = run_simulation(3, Some(4), None).unwrap();
//! assert!(outcome.ledger.is_valid());
//! SimulationSnapshot::from_outcome(&outcome)
//!     .write_to("snapshot.json")
//!     .unwrap();
//! ```

#![warn(clippy::all)]

pub mod actors;
pub mod config;
pub mod driver;
pub mod error;
pub mod export;

pub use actors::{ActorDirectory, Role};
pub use config::{BatchPolicy, SimulationConfig, MAX_PRODUCTS};
pub use driver::{
    run_simulation, RejectedEvent, SimulationDriver, SimulationOutcome, SimulationReport,
};
pub use error::{ExportError, SimulationError};
pub use export::{SimulationSnapshot, SnapshotMeta};
