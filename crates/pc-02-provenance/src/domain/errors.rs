//! Provenance error types.
//!
//! Every variant carries the product id so a failure can be reproduced.

use shared_types::{ProductId, ProductStatus, ValidationError};
use thiserror::Error;

/// Provenance error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvenanceError {
    /// Requested status is not the successor of the current one.
    #[error("Invalid transition for {product_id}: {current} -> {requested}")]
    InvalidTransition {
        product_id: ProductId,
        current: ProductStatus,
        requested: ProductStatus,
    },

    /// No product is registered under this id.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// A product with this id already exists.
    #[error("Duplicate product: {0}")]
    DuplicateProduct(ProductId),

    /// Malformed event (empty actor, time regression, bad payload).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ProvenanceError {
    /// The product the error refers to, when known.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            Self::InvalidTransition { product_id, .. }
            | Self::UnknownProduct(product_id)
            | Self::DuplicateProduct(product_id) => Some(product_id),
            Self::Validation(_) => None,
        }
    }
}
