//! # Simulation Configuration
//!
//! Unified configuration for the driver and the ledger it feeds.
//!
//! ## Layering
//!
//! The binary builds a config from, in increasing precedence:
//! 1. [`SimulationConfig::default`]
//! 2. A JSON file (`--config` / `PC_CONFIG`), any subset of fields
//! 3. Environment overrides ([`SimulationConfig::apply_env`])
//! 4. CLI flags

use chrono::{NaiveDate, NaiveDateTime};
use pc_01_ledger::LedgerConfig;
use serde::{Deserialize, Serialize};
use shared_types::time::naive_seconds;
use shared_types::ValidationError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ExportError;

/// Largest run the dashboard accepts.
pub const MAX_PRODUCTS: usize = 100;

/// Complete simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of synthetic products (1..=100).
    pub num_products: usize,
    /// RNG seed for actor choice, time steps and fault injection.
    pub seed: u64,
    /// How events are grouped into blocks.
    pub batch_policy: BatchPolicy,
    /// Ledger difficulty, mining bound and genesis time.
    pub ledger: LedgerConfig,
    /// Timestamp of the first creation event.
    #[serde(with = "naive_seconds")]
    pub start_time: NaiveDateTime,
    /// Shortest gap between two events of one product (hours).
    pub min_step_hours: u32,
    /// Longest gap between two events of one product (hours).
    pub max_step_hours: u32,
    /// Synthetic actors generated per role.
    pub actors_per_role: usize,
    /// Probability that an event is first attempted with an illegal status.
    pub invalid_event_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_products: 10,
            seed: 42,
            batch_policy: BatchPolicy::Wave,
            ledger: LedgerConfig::default(),
            start_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(8, 0, 0))
                .unwrap_or_default(),
            min_step_hours: 1,
            max_step_hours: 48,
            actors_per_role: 3,
            invalid_event_rate: 0.0,
        }
    }
}

impl SimulationConfig {
    /// Defaults with the given product count.
    pub fn with_products(num_products: usize) -> Self {
        Self {
            num_products,
            ..Self::default()
        }
    }

    /// Reject out-of-range parameters before anything runs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=MAX_PRODUCTS).contains(&self.num_products) {
            return Err(ValidationError::out_of_range(
                "num_products",
                self.num_products,
                "1..=100",
            ));
        }
        if self.actors_per_role == 0 {
            return Err(ValidationError::out_of_range(
                "actors_per_role",
                self.actors_per_role,
                ">= 1",
            ));
        }
        if self.min_step_hours > self.max_step_hours {
            return Err(ValidationError::out_of_range(
                "min_step_hours",
                self.min_step_hours,
                "<= max_step_hours",
            ));
        }
        if !(0.0..=1.0).contains(&self.invalid_event_rate) {
            return Err(ValidationError::out_of_range(
                "invalid_event_rate",
                self.invalid_event_rate,
                "0.0..=1.0",
            ));
        }
        if let BatchPolicy::FixedCount(0) = self.batch_policy {
            return Err(ValidationError::out_of_range(
                "batch_policy",
                0,
                "fixed count >= 1",
            ));
        }
        self.ledger.validate()
    }

    /// Load a (possibly partial) config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Apply `PC_*` overrides read through `lookup`.
    ///
    /// Unparseable values are rejected rather than ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PC_NUM_PRODUCTS") {
            self.num_products = parse_env("PC_NUM_PRODUCTS", &v)?;
        }
        if let Some(v) = lookup("PC_DIFFICULTY") {
            self.ledger.difficulty = parse_env("PC_DIFFICULTY", &v)?;
        }
        if let Some(v) = lookup("PC_MAX_ATTEMPTS") {
            self.ledger.mining.max_attempts = parse_env("PC_MAX_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("PC_SEED") {
            self.seed = parse_env("PC_SEED", &v)?;
        }
        if let Some(v) = lookup("PC_MINING_THREADS") {
            self.ledger.mining.threads = parse_env("PC_MINING_THREADS", &v)?;
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(name: &'static str, value: &str) -> Result<T, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::out_of_range(name, value, "a number"))
}

/// Block batching policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// One block per lifecycle stage across all products.
    #[default]
    Wave,
    /// Cut a block every `n` transactions; the tail is flushed at the end.
    FixedCount(usize),
}

impl FromStr for BatchPolicy {
    type Err = ValidationError;

    /// `wave` or a positive transaction count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("wave") {
            return Ok(Self::Wave);
        }
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Self::FixedCount(n)),
            _ => Err(ValidationError::out_of_range(
                "batch_policy",
                s,
                "\"wave\" or a positive count",
            )),
        }
    }
}

impl fmt::Display for BatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wave => f.write_str("wave"),
            Self::FixedCount(n) => write!(f, "{}", n),
        }
    }
}
