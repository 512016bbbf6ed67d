//! # Supply-Chain Transactions
//!
//! A [`Transaction`] is the immutable ledger record of one product event.
//! The event itself is a tagged variant with typed fields, so a payload
//! that does not follow the lifecycle table cannot be constructed or
//! deserialized.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entities::{ActorId, ProductId, ProductStatus};
use crate::errors::ValidationError;
use crate::time::{naive_seconds, whole_seconds};

/// The kind-specific part of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SupplyChainEvent {
    /// A product enters the system with status `Created`.
    Created { origin: String },
    /// A product moves one step forward in its lifecycle.
    StatusChanged {
        prior_status: ProductStatus,
        new_status: ProductStatus,
    },
}

impl SupplyChainEvent {
    /// Check the event against the lifecycle table.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            SupplyChainEvent::Created { origin } => {
                if origin.trim().is_empty() {
                    return Err(ValidationError::EmptyIdentifier { field: "origin" });
                }
                Ok(())
            }
            SupplyChainEvent::StatusChanged {
                prior_status,
                new_status,
            } => {
                if prior_status.successor() != Some(*new_status) {
                    return Err(ValidationError::MalformedEvent {
                        reason: format!(
                            "{} is not the successor of {}",
                            new_status, prior_status
                        ),
                    });
                }
                Ok(())
            }
        }
    }

    /// Status the product holds after this event.
    pub fn new_status(&self) -> ProductStatus {
        match self {
            SupplyChainEvent::Created { .. } => ProductStatus::Created,
            SupplyChainEvent::StatusChanged { new_status, .. } => *new_status,
        }
    }

    /// Status the product held before this event (`None` for creation).
    pub fn prior_status(&self) -> Option<ProductStatus> {
        match self {
            SupplyChainEvent::Created { .. } => None,
            SupplyChainEvent::StatusChanged { prior_status, .. } => Some(*prior_status),
        }
    }
}

/// Immutable record of one supply-chain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTransaction")]
pub struct Transaction {
    product_id: ProductId,
    actor: ActorId,
    #[serde(with = "naive_seconds")]
    at: NaiveDateTime,
    event: SupplyChainEvent,
}

#[derive(Deserialize)]
struct RawTransaction {
    product_id: ProductId,
    actor: ActorId,
    #[serde(with = "naive_seconds")]
    at: NaiveDateTime,
    event: SupplyChainEvent,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = ValidationError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        Transaction::new(raw.product_id, raw.actor, raw.at, raw.event)
    }
}

impl Transaction {
    /// Build a transaction, validating the event. `at` is truncated to
    /// whole seconds.
    pub fn new(
        product_id: ProductId,
        actor: ActorId,
        at: NaiveDateTime,
        event: SupplyChainEvent,
    ) -> Result<Self, ValidationError> {
        event.validate()?;
        Ok(Self {
            product_id,
            actor,
            at: whole_seconds(at),
            event,
        })
    }

    /// Creation event for a new product.
    pub fn created(
        product_id: ProductId,
        origin: impl Into<String>,
        actor: ActorId,
        at: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        Self::new(
            product_id,
            actor,
            at,
            SupplyChainEvent::Created {
                origin: origin.into(),
            },
        )
    }

    /// Forward status change; rejected unless `new_status` succeeds `prior_status`.
    pub fn status_changed(
        product_id: ProductId,
        prior_status: ProductStatus,
        new_status: ProductStatus,
        actor: ActorId,
        at: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        Self::new(
            product_id,
            actor,
            at,
            SupplyChainEvent::StatusChanged {
                prior_status,
                new_status,
            },
        )
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    pub fn at(&self) -> NaiveDateTime {
        self.at
    }

    pub fn event(&self) -> &SupplyChainEvent {
        &self.event
    }

    pub fn new_status(&self) -> ProductStatus {
        self.event.new_status()
    }

    /// Deterministic, length-prefixed encoding used for block hashing.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(96);
        put_str(&mut bytes, self.product_id.as_str());
        put_str(&mut bytes, self.actor.as_str());
        bytes.extend_from_slice(&self.at.and_utc().timestamp().to_le_bytes());

        match &self.event {
            SupplyChainEvent::Created { origin } => {
                bytes.push(0);
                put_str(&mut bytes, origin);
            }
            SupplyChainEvent::StatusChanged {
                prior_status,
                new_status,
            } => {
                bytes.push(1);
                bytes.push(prior_status.code());
                bytes.push(new_status.code());
            }
        }

        bytes
    }
}

fn put_str(bytes: &mut Vec<u8>, value: &str) {
    bytes.extend_from_slice(&(value.len() as u64).to_le_bytes());
    bytes.extend_from_slice(value.as_bytes());
}
