//! Order ledger handlers.
//!
//! # Responsibility
//! - Map order placement, lookup, listing, totals and status mutation
//!   onto the ledger service.
//!
//! # Invariants
//! - Purchaser identity always comes from the request headers, never the
//!   body.
//! - Status tokens arriving in query/body form are rejected before the
//!   store is touched when they do not parse.

use crate::error::ApiError;
use crate::identity::purchaser_from_headers;
use crate::routes::clamp_limit;
use crate::state::{run_core, SharedState};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vitrine_core::{
    Order, OrderListQuery, OrderService, OrderStatus, SqliteOrderRepository,
    SqliteProductRepository,
};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    pub purchaser_id: Option<Uuid>,
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct OrderTotalBody {
    pub order_id: Uuid,
    pub total_cents: i64,
}

fn ledger(conn: &Connection) -> OrderService<SqliteProductRepository<'_>, SqliteOrderRepository<'_>> {
    OrderService::new(
        SqliteProductRepository::new(conn),
        SqliteOrderRepository::new(conn),
    )
}

pub async fn create_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let purchaser = purchaser_from_headers(&headers)?;

    let order = run_core(state, move |conn| {
        ledger(conn).place_order(purchaser, body.product_id, body.quantity)
    })
    .await??;

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    let order = run_core(state, move |conn| ledger(conn).get_order(id)).await??;

    order
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("order not found: {id}")))
}

pub async fn list_orders(
    State(state): State<SharedState>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let status = match params.status.as_deref() {
        Some(raw) => Some(
            OrderStatus::parse(raw)
                .ok_or_else(|| ApiError::validation(format!("unknown order status `{raw}`")))?,
        ),
        None => None,
    };

    let query = OrderListQuery {
        purchaser: params.purchaser_id,
        status,
        limit: Some(clamp_limit(params.limit)),
        offset: params.offset.unwrap_or(0),
    };

    let orders = run_core(state, move |conn| ledger(conn).list_orders(&query)).await??;

    Ok(Json(orders))
}

pub async fn order_total(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderTotalBody>, ApiError> {
    let total_cents = run_core(state, move |conn| ledger(conn).total_cents(id)).await??;

    Ok(Json(OrderTotalBody {
        order_id: id,
        total_cents,
    }))
}

pub async fn update_order_status(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    let order = run_core(state, move |conn| {
        ledger(conn).update_status(id, body.status)
    })
    .await??;

    Ok(Json(order))
}
