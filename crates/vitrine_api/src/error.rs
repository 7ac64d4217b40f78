//! API error envelope and core-error mapping.
//!
//! # Responsibility
//! - Surface every core failure as a structured JSON body with a
//!   distinguishing code; nothing is silently swallowed.
//!
//! # Invariants
//! - Caller mistakes map to 4xx, upstream trouble to 502, storage defects
//!   to 500.
//! - The API layer retries nothing; callers decide.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use vitrine_core::{CatalogError, GatewayError, LedgerError};

/// Structured error response produced by every failing handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                "event=api_error module=api status=error http_status={} error_code={} error={}",
                self.status.as_u16(),
                self.code,
                self.message
            );
        }

        let body = ErrorBody {
            code: self.code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::Validation(err) => Self::validation(err.to_string()),
            CatalogError::NotFound(id) => Self::not_found(format!("product not found: {id}")),
            CatalogError::Db(err) => Self::internal(err.to_string()),
            CatalogError::InvalidData(message) => Self::internal(message),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::Validation(err) => Self::validation(err.to_string()),
            LedgerError::NotFound(id) => Self::not_found(format!("order not found: {id}")),
            LedgerError::ProductNotFound(id) => {
                Self::not_found(format!("product not found: {id}"))
            }
            LedgerError::InvalidTransition { from, to } => Self::new(
                StatusCode::CONFLICT,
                "invalid_transition",
                format!(
                    "order status cannot move from {} to {}",
                    from.as_str(),
                    to.as_str()
                ),
            ),
            LedgerError::Db(err) => Self::internal(err.to_string()),
            LedgerError::InvalidData(message) => Self::internal(message),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::CountOutOfRange(_) => Self::validation(value.to_string()),
            GatewayError::Transport(_)
            | GatewayError::UpstreamStatus(_)
            | GatewayError::MalformedResponse(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "upstream_error", value.to_string())
            }
        }
    }
}
