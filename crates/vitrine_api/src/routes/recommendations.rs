//! Recommendation handlers.
//!
//! # Responsibility
//! - Validate count bounds, then pass the opaque feature vector through
//!   to the gateway.
//!
//! # Invariants
//! - The feature vector is never interpreted here.
//! - The gateway call runs on a blocking thread; its timeout is enforced
//!   by the gateway itself.

use crate::error::ApiError;
use crate::state::SharedState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vitrine_core::{RECOMMEND_COUNT_MAX, RECOMMEND_COUNT_MIN};

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub features: Vec<f64>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub product_ids: Vec<Uuid>,
}

pub async fn recommend(
    State(state): State<SharedState>,
    Json(body): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    if !(RECOMMEND_COUNT_MIN..=RECOMMEND_COUNT_MAX).contains(&body.count) {
        return Err(ApiError::validation(format!(
            "count must be within {RECOMMEND_COUNT_MIN}..={RECOMMEND_COUNT_MAX}, got {}",
            body.count
        )));
    }

    let product_ids = tokio::task::spawn_blocking(move || {
        state.recommend(&body.features, body.count)
    })
    .await
    .map_err(|_| ApiError::internal("recommendation task aborted"))??;

    Ok(Json(RecommendResponse { product_ids }))
}
