//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record served to every storefront surface.
//! - Provide lifecycle helpers for tombstone semantics.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another product.
//! - `price_cents` is never negative.
//! - `is_deleted` is the source of truth for tombstone state; tombstoned
//!   products stay resolvable for the orders that reference them.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for catalog products.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ProductId = Uuid;

/// Validation failures for product records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    /// The nil UUID is reserved and never a valid identity.
    NilUuid,
    /// Product name must contain at least one non-whitespace character.
    EmptyName,
    /// Prices are integer minor units and must be `>= 0`.
    NegativePrice(i64),
    /// Every product carries an image locator for the storefront listing.
    EmptyImageRef,
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "product uuid must not be nil"),
            Self::EmptyName => write!(f, "product name must not be empty"),
            Self::NegativePrice(cents) => {
                write!(f, "product price must not be negative, got {cents}")
            }
            Self::EmptyImageRef => write!(f, "product image reference must not be empty"),
        }
    }
}

impl Error for ProductValidationError {}

/// Canonical catalog record.
///
/// Asset fields are opaque locators resolved by an external object store;
/// core never inspects their contents or format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable global ID used for order references and auditing.
    pub uuid: ProductId,
    /// Display name shown in catalog listings.
    pub name: String,
    /// Free-form description. May be empty.
    pub description: String,
    /// Price in integer minor units (cents).
    pub price_cents: i64,
    /// Opaque locator for the listing image.
    pub image_ref: String,
    /// Opaque locator for the 3D showcase asset, when one exists.
    pub model_ref: Option<String>,
    /// Soft delete tombstone preserving pricing for existing orders.
    pub is_deleted: bool,
}

impl Product {
    /// Creates a new product with a generated stable ID.
    ///
    /// # Invariants
    /// - `model_ref` starts as `None`.
    /// - `is_deleted` starts as `false`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price_cents: i64,
        image_ref: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), name, description, price_cents, image_ref)
    }

    /// Creates a product with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    /// This constructor does not validate; call `validate()` before
    /// persisting.
    pub fn with_id(
        uuid: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        price_cents: i64,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            uuid,
            name: name.into(),
            description: description.into(),
            price_cents,
            image_ref: image_ref.into(),
            model_ref: None,
            is_deleted: false,
        }
    }

    /// Checks the record against catalog invariants.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.uuid.is_nil() {
            return Err(ProductValidationError::NilUuid);
        }
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        if self.price_cents < 0 {
            return Err(ProductValidationError::NegativePrice(self.price_cents));
        }
        if self.image_ref.trim().is_empty() {
            return Err(ProductValidationError::EmptyImageRef);
        }
        Ok(())
    }

    /// Marks this product as softly deleted (tombstoned).
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Clears the soft delete flag.
    pub fn restore(&mut self) {
        self.is_deleted = false;
    }

    /// Returns whether this product should be considered purchasable.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
