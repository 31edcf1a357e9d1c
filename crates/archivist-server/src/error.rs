//! API error type mapped to HTTP status codes.
//!
//! Every variant renders as `{"msg": "..."}`, the shape the web client
//! already reads for login and validation failures.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    /// Invalid request content (400).
    BadRequest(String),
    /// Missing or unknown token (401).
    Unauthorized(String),
    /// Authenticated but lacking the required role (403).
    Forbidden(String),
    /// Backend or other unexpected failure (500).
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "msg": msg }))).into_response()
    }
}

impl From<archivist_core::Error> for ApiError {
    fn from(err: archivist_core::Error) -> Self {
        match err {
            archivist_core::Error::Validation(msg) => ApiError::BadRequest(msg),
            other => {
                error!("Request failed: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

/// Bodies that are not JSON or do not fit the request type are a 400, not
/// the 415/422 axum would otherwise answer with.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    }
}
