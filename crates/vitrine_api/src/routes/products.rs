//! Catalog resource handlers.
//!
//! # Responsibility
//! - Map product CRUD onto the catalog service.
//!
//! # Invariants
//! - Handlers validate/parse input, delegate, and serialize; catalog
//!   invariants live in `vitrine_core`.

use crate::error::ApiError;
use crate::routes::clamp_limit;
use crate::state::{run_core, SharedState};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use vitrine_core::{
    CatalogService, Product, ProductDraft, ProductListQuery, ProductUpdate,
    SqliteProductRepository,
};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub image_ref: String,
    #[serde(default)]
    pub model_ref: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub image_ref: Option<String>,
    /// Absent keeps the stored asset, `null` clears it, a string replaces
    /// it.
    #[serde(default, deserialize_with = "double_option")]
    pub model_ref: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub name_contains: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    #[serde(default)]
    pub include_deleted: bool,
}

pub async fn create_product(
    State(state): State<SharedState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let draft = ProductDraft {
        name: body.name,
        description: body.description,
        price_cents: body.price_cents,
        image_ref: body.image_ref,
        model_ref: body.model_ref,
    };

    let product = run_core(state, move |conn| {
        CatalogService::new(SqliteProductRepository::new(conn)).create_product(&draft)
    })
    .await??;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    let product = run_core(state, move |conn| {
        CatalogService::new(SqliteProductRepository::new(conn)).get_product(id, false)
    })
    .await??;

    product
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("product not found: {id}")))
}

pub async fn list_products(
    State(state): State<SharedState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let query = ProductListQuery {
        name_contains: params.name_contains,
        include_deleted: params.include_deleted,
        limit: Some(clamp_limit(params.limit)),
        offset: params.offset.unwrap_or(0),
    };

    let products = run_core(state, move |conn| {
        CatalogService::new(SqliteProductRepository::new(conn)).list_products(&query)
    })
    .await??;

    Ok(Json(products))
}

pub async fn update_product(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let update = ProductUpdate {
        name: body.name,
        description: body.description,
        price_cents: body.price_cents,
        image_ref: body.image_ref,
        model_ref: body.model_ref,
    };

    let product = run_core(state, move |conn| {
        CatalogService::new(SqliteProductRepository::new(conn)).update_product(id, &update)
    })
    .await??;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    run_core(state, move |conn| {
        CatalogService::new(SqliteProductRepository::new(conn)).delete_product(id)
    })
    .await??;

    Ok(StatusCode::NO_CONTENT)
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
