//! Provenance domain entities.
//!
//! A [`Product`] owns its [`History`]. Both are read-only outside this
//! crate: the only way to change them is through the tracker, which appends
//! one entry and updates status and holder in the same call.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared_types::{ActorId, HistoryEntry, ProductId, ProductStatus, ValidationError};

// =============================================================================
// HISTORY
// =============================================================================

/// Append-only chain of custody.
///
/// Never empty, non-decreasing in `date`. Elements are only reachable by
/// shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<HistoryEntry>", try_from = "Vec<HistoryEntry>")]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub(crate) fn seeded(first: HistoryEntry) -> Self {
        Self {
            entries: vec![first],
        }
    }

    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Most recent entry.
    pub fn latest(&self) -> &HistoryEntry {
        // Non-empty by construction
        &self.entries[self.entries.len() - 1]
    }

    /// Date of the most recent entry.
    pub fn latest_date(&self) -> NaiveDateTime {
        self.latest().date
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<History> for Vec<HistoryEntry> {
    fn from(history: History) -> Self {
        history.entries
    }
}

impl TryFrom<Vec<HistoryEntry>> for History {
    type Error = ValidationError;

    fn try_from(entries: Vec<HistoryEntry>) -> Result<Self, Self::Error> {
        if entries.is_empty() {
            return Err(ValidationError::out_of_range(
                "history",
                "0 entries",
                "at least one entry",
            ));
        }
        if entries[0].status != ProductStatus::Created {
            return Err(ValidationError::MalformedEvent {
                reason: format!("history must start at Created, found {}", entries[0].status),
            });
        }
        for pair in entries.windows(2) {
            if pair[1].date < pair[0].date {
                return Err(ValidationError::TimeRegression {
                    subject: "history".to_string(),
                    latest: pair[0].date,
                    attempted: pair[1].date,
                });
            }
            if pair[0].status.successor() != Some(pair[1].status) {
                return Err(ValidationError::MalformedEvent {
                    reason: format!(
                        "history skips from {} to {}",
                        pair[0].status, pair[1].status
                    ),
                });
            }
        }
        Ok(Self { entries })
    }
}

// =============================================================================
// PRODUCT
// =============================================================================

/// A tracked item moving through the supply chain.
///
/// `status` and `current_holder` always equal the latest history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProduct")]
pub struct Product {
    product_id: ProductId,
    origin: String,
    current_holder: ActorId,
    status: ProductStatus,
    history: History,
}

#[derive(Deserialize)]
struct RawProduct {
    product_id: ProductId,
    origin: String,
    current_holder: ActorId,
    status: ProductStatus,
    history: History,
}

impl TryFrom<RawProduct> for Product {
    type Error = ValidationError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        if raw.origin.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier { field: "origin" });
        }
        let latest = raw.history.latest();
        if latest.status != raw.status {
            return Err(ValidationError::MalformedEvent {
                reason: format!(
                    "{}: status {} does not match latest history entry {}",
                    raw.product_id, raw.status, latest.status
                ),
            });
        }
        if latest.updated_by != raw.current_holder {
            return Err(ValidationError::MalformedEvent {
                reason: format!(
                    "{}: holder {} does not match latest history entry {}",
                    raw.product_id, raw.current_holder, latest.updated_by
                ),
            });
        }
        Ok(Self {
            product_id: raw.product_id,
            origin: raw.origin,
            current_holder: raw.current_holder,
            status: raw.status,
            history: raw.history,
        })
    }
}

impl Product {
    /// New product in `Created`, held by the creating actor.
    pub(crate) fn create(
        product_id: ProductId,
        origin: String,
        actor: ActorId,
        when: NaiveDateTime,
    ) -> Self {
        let history = History::seeded(HistoryEntry {
            date: when,
            status: ProductStatus::Created,
            updated_by: actor.clone(),
        });
        Self {
            product_id,
            origin,
            current_holder: actor,
            status: ProductStatus::Created,
            history,
        }
    }

    /// Record a validated transition.
    ///
    /// Status, holder and history change together.
    pub(crate) fn advance(&mut self, entry: HistoryEntry) {
        self.status = entry.status;
        self.current_holder = entry.updated_by.clone();
        self.history.push(entry);
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn current_holder(&self) -> &ActorId {
        &self.current_holder
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Handoffs between consecutive holders.
    pub fn custody_edges(&self) -> impl Iterator<Item = CustodyEdge> + '_ {
        self.history.as_slice().windows(2).map(|pair| CustodyEdge {
            product_id: self.product_id.clone(),
            from: pair[0].updated_by.clone(),
            to: pair[1].updated_by.clone(),
            status: pair[1].status,
        })
    }
}

// =============================================================================
// CUSTODY EDGE
// =============================================================================

/// One handoff of a product from one holder to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyEdge {
    pub product_id: ProductId,
    pub from: ActorId,
    pub to: ActorId,
    /// Status the product entered with the new holder.
    pub status: ProductStatus,
}
