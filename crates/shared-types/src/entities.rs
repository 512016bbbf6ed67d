//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: [`ProductId`], [`ActorId`]
//! - **Integrity**: [`BlockHash`]
//! - **Lifecycle**: [`ProductStatus`], [`HistoryEntry`]

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;
use crate::time::naive_seconds;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Build an identifier, rejecting empty or whitespace-only input.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ValidationError::EmptyIdentifier { field: $field });
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Unique identifier of a tracked product.
    ProductId,
    "product_id"
);

string_id!(
    /// Identifier of a supply-chain actor (supplier, carrier, shop, customer).
    ActorId,
    "actor"
);

// =============================================================================
// CLUSTER B: INTEGRITY
// =============================================================================

/// A 32-byte SHA-2 digest, serialized as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BlockHash([u8; 32]);

impl BlockHash {
    /// Digest width in bits.
    pub const BITS: u32 = 256;

    /// The genesis `previous_hash` sentinel (64 `'0'` characters).
    pub const ZERO: BlockHash = BlockHash([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 32]> for BlockHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl FromStr for BlockHash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 {
            return Err(ValidationError::InvalidHash {
                reason: format!("expected 64 hex characters, got {}", s.len()),
            });
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| ValidationError::InvalidHash {
            reason: e.to_string(),
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({}..)", &self.to_hex()[..12])
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// CLUSTER C: LIFECYCLE
// =============================================================================

/// Lifecycle status of a product.
///
/// ```text
/// Created ──→ Manufactured ──→ In Transit ──→ Available for Sale ──→ Purchased
/// ```
///
/// The table is strictly forward and non-branching; `Purchased` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    Created,
    Manufactured,
    #[serde(rename = "In Transit")]
    InTransit,
    #[serde(rename = "Available for Sale")]
    AvailableForSale,
    Purchased,
}

impl ProductStatus {
    /// Every status in lifecycle order.
    pub const LIFECYCLE: [ProductStatus; 5] = [
        ProductStatus::Created,
        ProductStatus::Manufactured,
        ProductStatus::InTransit,
        ProductStatus::AvailableForSale,
        ProductStatus::Purchased,
    ];

    /// The only status reachable from `self`.
    pub fn successor(self) -> Option<ProductStatus> {
        match self {
            ProductStatus::Created => Some(ProductStatus::Manufactured),
            ProductStatus::Manufactured => Some(ProductStatus::InTransit),
            ProductStatus::InTransit => Some(ProductStatus::AvailableForSale),
            ProductStatus::AvailableForSale => Some(ProductStatus::Purchased),
            ProductStatus::Purchased => None,
        }
    }

    pub fn predecessor(self) -> Option<ProductStatus> {
        match self {
            ProductStatus::Created => None,
            ProductStatus::Manufactured => Some(ProductStatus::Created),
            ProductStatus::InTransit => Some(ProductStatus::Manufactured),
            ProductStatus::AvailableForSale => Some(ProductStatus::InTransit),
            ProductStatus::Purchased => Some(ProductStatus::AvailableForSale),
        }
    }

    pub fn is_terminal(self) -> bool {
        self.successor().is_none()
    }

    /// Zero-based position in [`ProductStatus::LIFECYCLE`].
    pub fn stage(self) -> usize {
        match self {
            ProductStatus::Created => 0,
            ProductStatus::Manufactured => 1,
            ProductStatus::InTransit => 2,
            ProductStatus::AvailableForSale => 3,
            ProductStatus::Purchased => 4,
        }
    }

    /// Stable one-byte code used in canonical encodings.
    pub fn code(self) -> u8 {
        self.stage() as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Created => "Created",
            ProductStatus::Manufactured => "Manufactured",
            ProductStatus::InTransit => "In Transit",
            ProductStatus::AvailableForSale => "Available for Sale",
            ProductStatus::Purchased => "Purchased",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a product's chain of custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the status change happened (`YYYY-MM-DDTHH:MM:SS`).
    #[serde(with = "naive_seconds")]
    pub date: NaiveDateTime,
    /// Status after the change.
    pub status: ProductStatus,
    /// Actor who performed the change and now holds the product.
    pub updated_by: ActorId,
}
