//! # Snapshot Export
//!
//! Read-only JSON view of a finished run, in the shape the dashboard
//! consumes: a product map and a block list, plus run metadata and the
//! custody edges behind the entity-network view.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use pc_01_ledger::{Block, Ledger, LedgerConfig};
use pc_02_provenance::{CustodyEdge, Product};
use serde::{Deserialize, Serialize};
use shared_types::{ActorId, ProductId, ProductStatus, SupplyChainEvent};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::driver::SimulationOutcome;
use crate::error::{ExportError, SimulationError};

/// Identity of one custody step, shared by a transaction and its history entry.
type CustodyRecord = (ProductId, ProductStatus, ActorId, NaiveDateTime);

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub run_id: Uuid,
    /// Difficulty every non-genesis block was mined at.
    pub difficulty: u32,
    pub generated_at: DateTime<Utc>,
    pub product_count: usize,
    pub block_count: usize,
}

/// Everything a consumer needs to render or audit a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub meta: SnapshotMeta,
    pub products: BTreeMap<ProductId, Product>,
    pub blockchain: Vec<Block>,
    pub custody: Vec<CustodyEdge>,
}

impl SimulationSnapshot {
    /// Capture a finished run.
    pub fn from_outcome(outcome: &SimulationOutcome) -> Self {
        let custody = outcome
            .products
            .values()
            .flat_map(|p| p.custody_edges())
            .collect();

        Self {
            meta: SnapshotMeta {
                run_id: outcome.report.run_id,
                difficulty: outcome.ledger.difficulty(),
                generated_at: Utc::now().trunc_subsecs(0),
                product_count: outcome.products.len(),
                block_count: outcome.ledger.len(),
            },
            products: outcome.products.clone(),
            blockchain: outcome.ledger.snapshot(),
            custody,
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write pretty JSON to `path`, replacing any existing file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        info!(
            "[sim] Snapshot written to {}: products={}, blocks={}",
            path.display(),
            self.meta.product_count,
            self.meta.block_count
        );
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Audit the snapshot as an untrusting consumer would.
    ///
    /// Re-imports the chain (which re-validates every block), then checks
    /// that metadata counts match, that each product's id matches its key,
    /// and that history entries and committed transactions pair up one to
    /// one on `(product, status, actor, date)`. A creation transaction's
    /// origin must also equal the product's. Per-product invariants were
    /// already checked when the products were deserialized.
    pub fn verify(&self) -> Result<Ledger, SimulationError> {
        let config = LedgerConfig::with_difficulty(self.meta.difficulty);
        let ledger = Ledger::from_blocks(self.blockchain.clone(), config)?;

        if self.meta.block_count != self.blockchain.len() {
            return Err(SimulationError::SnapshotMismatch(format!(
                "meta lists {} blocks, chain has {}",
                self.meta.block_count,
                self.blockchain.len()
            )));
        }
        if self.meta.product_count != self.products.len() {
            return Err(SimulationError::SnapshotMismatch(format!(
                "meta lists {} products, map has {}",
                self.meta.product_count,
                self.products.len()
            )));
        }
        if let Some((key, product)) = self
            .products
            .iter()
            .find(|(key, product)| *key != product.product_id())
        {
            return Err(SimulationError::SnapshotMismatch(format!(
                "product {} stored under key {}",
                product.product_id(),
                key
            )));
        }

        // Each committed transaction must be matched by exactly one history
        // entry with the same product, status, actor and date.
        let mut unmatched: BTreeMap<CustodyRecord, isize> = BTreeMap::new();
        for tx in self.blockchain.iter().flat_map(|b| &b.transactions) {
            if let SupplyChainEvent::Created { origin } = tx.event() {
                let recorded = self.products.get(tx.product_id()).map(Product::origin);
                if recorded != Some(origin.as_str()) {
                    return Err(SimulationError::SnapshotMismatch(format!(
                        "{} created with origin {} but product records {:?}",
                        tx.product_id(),
                        origin,
                        recorded
                    )));
                }
            }
            let key = (tx.product_id().clone(), tx.new_status(), tx.actor().clone(), tx.at());
            *unmatched.entry(key).or_default() += 1;
        }
        for product in self.products.values() {
            for entry in product.history() {
                let key = (
                    product.product_id().clone(),
                    entry.status,
                    entry.updated_by.clone(),
                    entry.date,
                );
                *unmatched.entry(key).or_default() -= 1;
            }
        }

        if let Some(((product_id, status, actor, at), count)) =
            unmatched.into_iter().find(|(_, count)| *count != 0)
        {
            let side = if count > 0 {
                "committed transaction has no history entry"
            } else {
                "history entry has no committed transaction"
            };
            return Err(SimulationError::SnapshotMismatch(format!(
                "{}: {} {} by {} at {}",
                side, product_id, status, actor, at
            )));
        }

        Ok(ledger)
    }
}
