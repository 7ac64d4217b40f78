//! Purchaser identity extraction.
//!
//! # Responsibility
//! - Pull the authenticated purchaser identity out of request headers.
//!
//! # Invariants
//! - Authentication itself happens upstream; this layer only trusts the
//!   header an external identity provider attaches to the request.

use crate::error::ApiError;
use axum::http::HeaderMap;
use uuid::Uuid;
use vitrine_core::PurchaserId;

/// Header carrying the authenticated purchaser identity.
pub const PURCHASER_HEADER: &str = "x-purchaser-id";

/// Extracts the purchaser identity or rejects the request.
pub fn purchaser_from_headers(headers: &HeaderMap) -> Result<PurchaserId, ApiError> {
    let raw = headers
        .get(PURCHASER_HEADER)
        .ok_or_else(|| ApiError::unauthorized(format!("missing {PURCHASER_HEADER} header")))?;

    let text = raw
        .to_str()
        .map_err(|_| ApiError::unauthorized(format!("unreadable {PURCHASER_HEADER} header")))?;

    Uuid::parse_str(text)
        .map_err(|_| ApiError::unauthorized(format!("malformed {PURCHASER_HEADER} header")))
}

#[cfg(test)]
mod tests {
    use super::{purchaser_from_headers, PURCHASER_HEADER};
    use axum::http::{HeaderMap, HeaderValue, StatusCode};
    use uuid::Uuid;

    #[test]
    fn extracts_valid_identity() {
        let purchaser = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            PURCHASER_HEADER,
            HeaderValue::from_str(&purchaser.to_string()).unwrap(),
        );

        assert_eq!(purchaser_from_headers(&headers).unwrap(), purchaser);
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = purchaser_from_headers(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn malformed_header_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(PURCHASER_HEADER, HeaderValue::from_static("not-a-uuid"));

        let err = purchaser_from_headers(&headers).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
