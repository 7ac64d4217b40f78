//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide stable product CRUD entry points for core callers.
//! - Translate partial update requests into whole-record repository writes.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - The service layer remains storage-agnostic.

use crate::model::product::{Product, ProductId};
use crate::repo::product_repo::{CatalogError, CatalogResult, ProductListQuery, ProductRepository};

/// Use-case service wrapper for catalog operations.
pub struct CatalogService<R: ProductRepository> {
    repo: R,
}

/// Creation input for a new catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub image_ref: String,
    pub model_ref: Option<String>,
}

/// Partial update applied on top of the stored record.
///
/// `None` fields keep their stored value. `model_ref` distinguishes
/// "leave unchanged" (`None`) from "clear the asset" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub image_ref: Option<String>,
    pub model_ref: Option<Option<String>>,
}

impl<R: ProductRepository> CatalogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new product and returns the stored record.
    pub fn create_product(&self, draft: &ProductDraft) -> CatalogResult<Product> {
        let mut product = Product::new(
            draft.name.clone(),
            draft.description.clone(),
            draft.price_cents,
            draft.image_ref.clone(),
        );
        product.model_ref = draft.model_ref.clone();
        self.repo.create_product(&product)?;
        Ok(product)
    }

    /// Gets one product by ID with optional tombstone visibility.
    pub fn get_product(
        &self,
        id: ProductId,
        include_deleted: bool,
    ) -> CatalogResult<Option<Product>> {
        self.repo.get_product(id, include_deleted)
    }

    /// Lists products using filter and pagination options.
    pub fn list_products(&self, query: &ProductListQuery) -> CatalogResult<Vec<Product>> {
        self.repo.list_products(query)
    }

    /// Applies a partial update to an active product and returns the
    /// resulting record.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_product(&self, id: ProductId, update: &ProductUpdate) -> CatalogResult<Product> {
        let mut product = self
            .repo
            .get_product(id, false)?
            .ok_or(CatalogError::NotFound(id))?;

        if let Some(name) = update.name.as_ref() {
            product.name = name.clone();
        }
        if let Some(description) = update.description.as_ref() {
            product.description = description.clone();
        }
        if let Some(price_cents) = update.price_cents {
            product.price_cents = price_cents;
        }
        if let Some(image_ref) = update.image_ref.as_ref() {
            product.image_ref = image_ref.clone();
        }
        if let Some(model_ref) = update.model_ref.as_ref() {
            product.model_ref = model_ref.clone();
        }

        self.repo.update_product(&product)?;
        Ok(product)
    }

    /// Tombstones a product by ID.
    ///
    /// Existing orders keep resolving the tombstoned row for pricing; new
    /// orders against it are rejected by the ledger service.
    pub fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        self.repo.soft_delete_product(id)
    }

    /// Clears a product's tombstone, making it purchasable again.
    pub fn restore_product(&self, id: ProductId) -> CatalogResult<()> {
        self.repo.restore_product(id)
    }
}
