//! Route table and shared request plumbing.
//!
//! # Responsibility
//! - Compose the full storefront router.
//! - Keep pagination parsing consistent across list endpoints.

use crate::state::SharedState;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

pub mod orders;
pub mod products;
pub mod recommendations;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// Builds the public API router over shared server state.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route("/orders/{id}", get(orders::get_order))
        .route("/orders/{id}/total", get(orders::order_total))
        .route("/orders/{id}/status", post(orders::update_order_status))
        .route("/recommendations", post(recommendations::recommend))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        version: vitrine_core::core_version(),
    })
}

/// Applies the default page size and the hard cap to a raw limit.
pub(crate) fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
}
