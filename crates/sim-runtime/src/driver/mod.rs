//! # Simulation Driver
//!
//! Generates synthetic products, walks each through the lifecycle and
//! commits every accepted event to the ledger.
//!
//! ## Flow
//!
//! ```text
//! plan events (wave-major) ──→ cut batches ──→ per batch:
//!     clone tracker ──→ apply events to the clone ──→ Ledger::append
//!                                                        │
//!                       success: clone becomes live ◄────┤
//!                       failure: abort, live state untouched
//! ```
//!
//! A product's history only changes together with the block that records
//! it, so total history entries always equal total committed transactions.


use chrono::{Duration, NaiveDateTime};
use pc_01_ledger::{Ledger, LedgerError, TimeSource};
use pc_02_provenance::{Product, ProvenanceError, ProvenanceTracker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use shared_types::{ActorId, ProductId, ProductStatus, Transaction};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::actors::{ActorDirectory, Role};
use crate::config::{BatchPolicy, SimulationConfig};
use crate::error::SimulationError;

/// Keeps the fault stream independent of the actor/time stream.
const FAULT_STREAM: u64 = 0x5EED_FA17;

/// Result of a completed run.
#[derive(Debug)]
pub struct SimulationOutcome {
    /// Final product map, keyed by id.
    pub products: BTreeMap<ProductId, Product>,
    /// The chain every event was committed to.
    pub ledger: Ledger,
    pub report: SimulationReport,
}

/// Run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: Uuid,
    /// Blocks appended after genesis.
    pub blocks_committed: usize,
    pub transactions_committed: usize,
    /// Requests the tracker refused; none reached the ledger.
    pub rejected_events: Vec<RejectedEvent>,
    pub elapsed_ms: u64,
}

/// A lifecycle request the tracker refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedEvent {
    pub product_id: ProductId,
    pub requested: ProductStatus,
    pub reason: String,
}

/// One scheduled lifecycle step.
#[derive(Debug, Clone)]
struct PlannedEvent {
    product_id: ProductId,
    status: ProductStatus,
    actor: ActorId,
    when: NaiveDateTime,
    /// Illegal status to request first, if this event is faulted.
    fault: Option<ProductStatus>,
}

/// Single-owner simulation over one tracker and one ledger.
#[derive(Debug)]
pub struct SimulationDriver {
    config: SimulationConfig,
    actors: ActorDirectory,
    tracker: ProvenanceTracker,
    ledger: Ledger,
    rejected: Vec<RejectedEvent>,
}

impl SimulationDriver {
    /// Validate `config` and set up an empty tracker and a fresh ledger.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let ledger = Ledger::new(config.ledger.clone());
        Self::build(config, ledger)
    }

    /// Same as [`SimulationDriver::new`] with an injected block clock.
    pub fn with_time_source(
        config: SimulationConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let ledger = Ledger::with_time_source(config.ledger.clone(), clock);
        Self::build(config, ledger)
    }

    fn build(config: SimulationConfig, ledger: Ledger) -> Result<Self, SimulationError> {
        Ok(Self {
            actors: ActorDirectory::new(config.actors_per_role)?,
            config,
            tracker: ProvenanceTracker::new(),
            ledger,
            rejected: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run every product through the full lifecycle.
    ///
    /// Mining timeouts and integrity failures abort the run; refused
    /// lifecycle requests are recorded and the run continues.
    pub fn run(mut self) -> Result<SimulationOutcome, SimulationError> {
        let started = Instant::now();
        let run_id = Uuid::new_v4();

        info!(
            "[sim] Run {} starting: products={}, difficulty={}, batch={}",
            run_id, self.config.num_products, self.config.ledger.difficulty, self.config.batch_policy
        );

        let events = self.plan_events()?;
        let batches = cut_batches(events, self.config.batch_policy, self.config.num_products);

        let blocks_before = self.ledger.len();
        for batch in batches {
            self.commit_batch(batch)?;
        }

        self.ledger.validate().map_err(LedgerError::from)?;

        let report = SimulationReport {
            run_id,
            blocks_committed: self.ledger.len() - blocks_before,
            transactions_committed: self.ledger.transaction_count(),
            rejected_events: self.rejected,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            "[sim] Run {} complete: blocks={}, transactions={}, rejected={}, elapsed={}ms",
            run_id,
            report.blocks_committed,
            report.transactions_committed,
            report.rejected_events.len(),
            report.elapsed_ms
        );

        Ok(SimulationOutcome {
            products: self.tracker.into_products(),
            ledger: self.ledger,
            report,
        })
    }

    /// Every event of the run, stage by stage, products in id order.
    fn plan_events(&self) -> Result<Vec<PlannedEvent>, SimulationError> {
        let n = self.config.num_products;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut fault_rng = StdRng::seed_from_u64(self.config.seed ^ FAULT_STREAM);
        let mut clocks = vec![self.config.start_time; n];

        let ids = (1..=n)
            .map(|i| ProductId::new(format!("PRD-{:04}", i)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut events = Vec::with_capacity(n * ProductStatus::LIFECYCLE.len());
        for status in ProductStatus::LIFECYCLE {
            for (product_id, clock) in ids.iter().zip(clocks.iter_mut()) {
                let step = rng.gen_range(self.config.min_step_hours..=self.config.max_step_hours);
                *clock += Duration::hours(i64::from(step));
                let actor = self.actors.pick(Role::for_status(status), &mut rng).clone();

                events.push(PlannedEvent {
                    product_id: product_id.clone(),
                    status,
                    actor,
                    when: *clock,
                    fault: self.draw_fault(status, &mut fault_rng),
                });
            }
        }
        Ok(events)
    }

    /// Pick an illegal request for a transition: a skip-ahead or a repeat.
    fn draw_fault(&self, target: ProductStatus, rng: &mut StdRng) -> Option<ProductStatus> {
        let current = target.predecessor()?;
        if !rng.gen_bool(self.config.invalid_event_rate) {
            return None;
        }
        let skip_ahead = rng.gen_bool(0.5);
        Some(match target.successor() {
            Some(beyond) if skip_ahead => beyond,
            _ => current,
        })
    }

    /// Apply a batch to a staged tracker and commit it with one block.
    fn commit_batch(&mut self, batch: Vec<PlannedEvent>) -> Result<(), SimulationError> {
        let mut staged = self.tracker.clone();
        let mut transactions = Vec::with_capacity(batch.len());

        for event in batch {
            if let Some(tx) = apply_event(&mut staged, event, &mut self.rejected) {
                transactions.push(tx);
            }
        }

        if transactions.is_empty() {
            warn!("[sim] Batch produced no transactions, nothing to commit");
            return Ok(());
        }

        let tx_count = transactions.len();
        let block = self.ledger.append(transactions)?;
        debug!(
            "[sim] Committed block {} with {} transactions",
            block.index, tx_count
        );

        self.tracker = staged;
        Ok(())
    }
}

/// Apply one planned event, recording any refusal.
fn apply_event(
    tracker: &mut ProvenanceTracker,
    event: PlannedEvent,
    rejected: &mut Vec<RejectedEvent>,
) -> Option<Transaction> {
    if let Some(illegal) = event.fault {
        match tracker.apply(&event.product_id, illegal, event.actor.clone(), event.when) {
            Err(err) => record_rejection(rejected, &event.product_id, illegal, &err),
            Ok(tx) => return Some(tx),
        }
    }

    let result = if event.status == ProductStatus::Created {
        // The creating supplier is the product's origin
        let origin = event.actor.to_string();
        tracker.create(event.product_id.clone(), origin, event.actor, event.when)
    } else {
        tracker.apply(&event.product_id, event.status, event.actor, event.when)
    };

    match result {
        Ok(tx) => Some(tx),
        Err(err) => {
            record_rejection(rejected, &event.product_id, event.status, &err);
            None
        }
    }
}

fn record_rejection(
    rejected: &mut Vec<RejectedEvent>,
    product_id: &ProductId,
    requested: ProductStatus,
    err: &ProvenanceError,
) {
    warn!("[sim] Rejected event: {}", err);
    rejected.push(RejectedEvent {
        product_id: product_id.clone(),
        requested,
        reason: err.to_string(),
    });
}

/// Group wave-major events into blocks.
fn cut_batches(
    events: Vec<PlannedEvent>,
    policy: BatchPolicy,
    wave_len: usize,
) -> Vec<Vec<PlannedEvent>> {
    let size = match policy {
        BatchPolicy::Wave => wave_len,
        BatchPolicy::FixedCount(n) => n,
    }
    .max(1);

    let mut batches = Vec::with_capacity(events.len() / size + 1);
    let mut events = events.into_iter().peekable();
    while events.peek().is_some() {
        batches.push(events.by_ref().take(size).collect());
    }
    batches
}

/// Run a simulation with defaults for everything but the given knobs.
///
/// # Errors
/// - `Validation` if `num_products` is outside 1..=100
/// - `Ledger` if a block cannot be mined within the attempt bound
pub fn run_simulation(
    num_products: usize,
    difficulty: Option<u32>,
    batch_policy: Option<BatchPolicy>,
) -> Result<SimulationOutcome, SimulationError> {
    let mut config = SimulationConfig::with_products(num_products);
    if let Some(difficulty) = difficulty {
        config.ledger.difficulty = difficulty;
    }
    if let Some(policy) = batch_policy {
        config.batch_policy = policy;
    }
    SimulationDriver::new(config)?.run()
}
