//! # Provenance Tracker - Product Registry and Lifecycle Enforcement
//!
//! Owns every [`Product`] keyed by id and is the only writer of their
//! histories.
//!
//! ## Lifecycle
//!
//! ```text
//! Created ──→ Manufactured ──→ In Transit ──→ Available for Sale ──→ Purchased
//! ```
//!
//! Each successful [`ProvenanceTracker::create`] or
//! [`ProvenanceTracker::apply`] returns the one [`Transaction`] that
//! records it. All checks run before the product is touched, so a rejected
//! request leaves status, holder and history as they were.


use super::entities::{CustodyEdge, Product};
use super::errors::ProvenanceError;
use chrono::NaiveDateTime;
use shared_types::time::whole_seconds;
use shared_types::{ActorId, HistoryEntry, ProductId, ProductStatus, Transaction, ValidationError};
use std::collections::BTreeMap;
use tracing::debug;

/// Product registry.
///
/// Cloning gives an independent staging copy; committing a batch is a
/// matter of replacing the live registry with the staged one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvenanceTracker {
    /// All products, ordered by id.
    products: BTreeMap<ProductId, Product>,
}

impl ProvenanceTracker {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new product in `Created`.
    ///
    /// # Errors
    /// - `DuplicateProduct` if the id is taken
    /// - `Validation` if `origin` is empty
    pub fn create(
        &mut self,
        product_id: ProductId,
        origin: impl Into<String>,
        actor: ActorId,
        when: NaiveDateTime,
    ) -> Result<Transaction, ProvenanceError> {
        if self.products.contains_key(&product_id) {
            return Err(ProvenanceError::DuplicateProduct(product_id));
        }

        let origin = origin.into();
        let tx = Transaction::created(product_id.clone(), origin.clone(), actor.clone(), when)?;

        debug!("[pc-02] {} created by {}", product_id, actor);
        self.products.insert(
            product_id.clone(),
            Product::create(product_id, origin, actor, tx.at()),
        );
        Ok(tx)
    }

    /// Move a product to `requested`, which must be its successor status.
    ///
    /// # Errors
    /// - `UnknownProduct` if no such product exists
    /// - `InvalidTransition` unless `requested == current.successor()`
    /// - `Validation` if `when` precedes the latest history date
    pub fn apply(
        &mut self,
        product_id: &ProductId,
        requested: ProductStatus,
        actor: ActorId,
        when: NaiveDateTime,
    ) -> Result<Transaction, ProvenanceError> {
        let product = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| ProvenanceError::UnknownProduct(product_id.clone()))?;

        let current = product.status();
        if current.successor() != Some(requested) {
            return Err(ProvenanceError::InvalidTransition {
                product_id: product_id.clone(),
                current,
                requested,
            });
        }

        let when = whole_seconds(when);
        let latest = product.history().latest_date();
        if when < latest {
            return Err(ValidationError::TimeRegression {
                subject: product_id.to_string(),
                latest,
                attempted: when,
            }
            .into());
        }

        let tx = Transaction::status_changed(
            product_id.clone(),
            current,
            requested,
            actor.clone(),
            when,
        )?;

        debug!(
            "[pc-02] {} {} -> {} by {}",
            product_id, current, requested, actor
        );
        product.advance(HistoryEntry {
            date: tx.at(),
            status: requested,
            updated_by: actor,
        });
        Ok(tx)
    }

    /// Gets a product by id.
    pub fn product(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// Checks if a product exists.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.products.contains_key(product_id)
    }

    /// All products in id order.
    pub fn products(&self) -> impl Iterator<Item = &Product> + '_ {
        self.products.values()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Total history entries across all products.
    pub fn history_len(&self) -> usize {
        self.products.values().map(|p| p.history().len()).sum()
    }

    /// Every custody handoff, product by product.
    pub fn custody_edges(&self) -> Vec<CustodyEdge> {
        self.products
            .values()
            .flat_map(|p| p.custody_edges())
            .collect()
    }

    /// Consume the registry, yielding the product map.
    pub fn into_products(self) -> BTreeMap<ProductId, Product> {
        self.products
    }
}
