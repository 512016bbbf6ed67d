//! Error types for the simulation runtime

use pc_01_ledger::LedgerError;
use pc_02_provenance::ProvenanceError;
use shared_types::ValidationError;
use thiserror::Error;

/// Errors that end (or prevent) a simulation run
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Out-of-range parameters, rejected before anything runs
    #[error("Invalid simulation config: {0}")]
    Validation(#[from] ValidationError),

    /// A lifecycle event the driver could not recover from
    #[error("Provenance error: {0}")]
    Provenance(#[from] ProvenanceError),

    /// Mining timeout or broken chain
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Snapshot could not be written or read
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Snapshot contents disagree with each other
    #[error("Snapshot mismatch: {0}")]
    SnapshotMismatch(String),
}

impl SimulationError {
    /// Structural failures that mean the produced data cannot be trusted
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Ledger(err) => err.is_fatal(),
            Self::SnapshotMismatch(_) => true,
            Self::Validation(_) | Self::Provenance(_) | Self::Export(_) => false,
        }
    }
}

/// Snapshot I/O failures
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
