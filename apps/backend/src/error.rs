//! Mapping of domain errors onto HTTP responses.
//!
//! Validation errors answer 400, unknown tokens and tickers 404, and
//! everything else 500 with a generic body (the detail goes to the log).

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use vaulto_common::error::VaultoError;

const INTERNAL_MESSAGE: &str = "Failed to fetch market data";

#[derive(Debug)]
pub enum ApiError {
    /// Malformed request: bad JSON, missing or mistyped fields.
    BadRequest(String),
    Vaulto(VaultoError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<VaultoError> for ApiError {
    fn from(e: VaultoError) -> Self {
        ApiError::Vaulto(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message, "code": "BAD_REQUEST" })),
            )
                .into_response(),
            ApiError::Vaulto(e) => {
                let detail = e.detail();
                let status = StatusCode::from_u16(detail.category.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let message = if status.is_server_error() {
                    error!(code = %detail.code, error = %e, "request failed");
                    INTERNAL_MESSAGE.to_string()
                } else {
                    detail.message
                };
                (status, Json(json!({ "error": message, "code": detail.code }))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let status = |e: VaultoError| ApiError::from(e).into_response().status();
        assert_eq!(status(VaultoError::UnsupportedChain(56)), StatusCode::BAD_REQUEST);
        assert_eq!(status(VaultoError::InvalidAddress("0x1".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(VaultoError::TokenNotFound("0x1".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(VaultoError::TickerNotFound("ZZZ".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(VaultoError::ProtocolTimeout("slow".into())), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status(VaultoError::ApiKeyMissing("The Graph".into())), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::BadRequest("missing field".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
