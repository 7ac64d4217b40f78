//! Core storefront logic for Vitrine.
//! This crate is the single source of truth for catalog and order
//! invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod recommend;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::order::{Order, OrderId, OrderStatus, OrderValidationError, PurchaserId};
pub use model::product::{Product, ProductId, ProductValidationError};
pub use recommend::gateway::{
    GatewayError, GatewayResult, HttpRecommendationGateway, RecommendationGateway,
    RECOMMEND_COUNT_MAX, RECOMMEND_COUNT_MIN,
};
pub use repo::order_repo::{
    LedgerError, LedgerResult, OrderListQuery, OrderRepository, SqliteOrderRepository,
};
pub use repo::product_repo::{
    CatalogError, CatalogResult, ProductListQuery, ProductRepository, SqliteProductRepository,
};
pub use service::catalog_service::{CatalogService, ProductDraft, ProductUpdate};
pub use service::order_service::OrderService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
