//! HTTP client for the external ranking service.
//!
//! # Responsibility
//! - Pass a user feature vector through to the ranking service and return
//!   the ordered product identifiers it supplies.
//! - Bound every call by the timeout fixed at construction.
//!
//! # Invariants
//! - `count` is validated against [`RECOMMEND_COUNT_MIN`] and
//!   [`RECOMMEND_COUNT_MAX`] before any network activity.
//! - Responses with an unexpected shape, unparseable identifiers, or more
//!   identifiers than requested are rejected, never truncated or repaired.
//! - No retries live here; callers decide.

use crate::model::product::ProductId;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Smallest recommendation batch a caller may request.
pub const RECOMMEND_COUNT_MIN: usize = 1;
/// Largest recommendation batch a caller may request.
pub const RECOMMEND_COUNT_MAX: usize = 100;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway error for ranking calls.
///
/// `CountOutOfRange` is a caller mistake; every other variant means the
/// upstream dependency was unreachable or answered with something this
/// system cannot trust.
#[derive(Debug)]
pub enum GatewayError {
    CountOutOfRange(usize),
    Transport(reqwest::Error),
    UpstreamStatus(u16),
    MalformedResponse(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CountOutOfRange(count) => write!(
                f,
                "recommendation count {count} outside allowed range {RECOMMEND_COUNT_MIN}..={RECOMMEND_COUNT_MAX}"
            ),
            Self::Transport(err) => write!(f, "ranking service unreachable: {err}"),
            Self::UpstreamStatus(status) => {
                write!(f, "ranking service answered with status {status}")
            }
            Self::MalformedResponse(message) => {
                write!(f, "malformed ranking response: {message}")
            }
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Boundary interface to the external, opaque ranking service.
pub trait RecommendationGateway {
    /// Returns at most `count` product identifiers, in upstream order.
    fn recommend(&self, features: &[f64], count: usize) -> GatewayResult<Vec<ProductId>>;
}

#[derive(Debug, Serialize)]
struct RankRequest<'a> {
    features: &'a [f64],
    count: usize,
}

#[derive(Debug, Deserialize)]
struct RankResponse {
    product_ids: Vec<String>,
}

/// Blocking HTTP implementation of the gateway contract.
pub struct HttpRecommendationGateway {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpRecommendationGateway {
    /// Builds a gateway for `base_url` whose calls never outlive `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> GatewayResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }
}

impl RecommendationGateway for HttpRecommendationGateway {
    fn recommend(&self, features: &[f64], count: usize) -> GatewayResult<Vec<ProductId>> {
        validate_count(count)?;

        let started_at = Instant::now();
        let url = format!("{}/rank", self.base_url);

        let response = match self
            .client
            .post(&url)
            .json(&RankRequest { features, count })
            .send()
        {
            Ok(response) => response,
            Err(err) => {
                error!(
                    "event=recommend_call module=recommend status=error duration_ms={} error_code=upstream_unreachable error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(err.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!(
                "event=recommend_call module=recommend status=error duration_ms={} error_code=upstream_status http_status={}",
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            return Err(GatewayError::UpstreamStatus(status.as_u16()));
        }

        let body: RankResponse = response.json().map_err(|err| {
            error!(
                "event=recommend_call module=recommend status=error duration_ms={} error_code=upstream_malformed error={err}",
                started_at.elapsed().as_millis()
            );
            GatewayError::MalformedResponse(err.to_string())
        })?;

        if body.product_ids.len() > count {
            return Err(GatewayError::MalformedResponse(format!(
                "requested {count} identifiers, upstream returned {}",
                body.product_ids.len()
            )));
        }

        let mut ids = Vec::with_capacity(body.product_ids.len());
        for raw in &body.product_ids {
            let id = Uuid::parse_str(raw).map_err(|_| {
                GatewayError::MalformedResponse(format!("unparseable product id `{raw}`"))
            })?;
            ids.push(id);
        }

        info!(
            "event=recommend_call module=recommend status=ok duration_ms={} requested={count} returned={}",
            started_at.elapsed().as_millis(),
            ids.len()
        );

        Ok(ids)
    }
}

fn validate_count(count: usize) -> GatewayResult<()> {
    if !(RECOMMEND_COUNT_MIN..=RECOMMEND_COUNT_MAX).contains(&count) {
        return Err(GatewayError::CountOutOfRange(count));
    }
    Ok(())
}
