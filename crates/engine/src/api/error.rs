//! HTTP error responses.

use axum::{
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::use_cases::{CollectionError, ErrorKind};

/// Header carrying the caller's transaction id.
pub const TRANSACTION_ID_HEADER: &str = "X-Request-Id";

/// Placeholder for errors not tied to a single collection.
pub const NO_UUID: &str = "N/A";

/// Error returned by collection handlers, rendered as `{"message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Conflict(String),
    Unavailable(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unavailable(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl From<CollectionError> for ApiError {
    fn from(e: CollectionError) -> Self {
        let message = e.to_string();
        match e.kind() {
            ErrorKind::Validation => ApiError::BadRequest(message),
            ErrorKind::Conflict => ApiError::Conflict(message),
            ErrorKind::Unavailable | ErrorKind::Timeout => ApiError::Unavailable(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "message": self.message() });
        (
            self.status(),
            [(header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

/// Request details attached to every error log line.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_url: String,
    pub transaction_id: String,
    pub uuid: String,
}

impl RequestContext {
    pub fn new(uri: &Uri, headers: &HeaderMap, uuid: impl Into<String>) -> Self {
        Self {
            request_url: uri.to_string(),
            transaction_id: transaction_id(headers),
            uuid: uuid.into(),
        }
    }

    /// Log `error` against this request and hand it back for the response.
    pub fn fail(&self, error: impl Into<ApiError>) -> ApiError {
        let error = error.into();
        tracing::error!(
            event = "error",
            request_url = %self.request_url,
            transaction_id = %self.transaction_id,
            status = error.status().as_u16(),
            uuid = %self.uuid,
            "{}",
            error.message()
        );
        error
    }
}

/// The caller's transaction id, or a fresh `tid_` one when absent.
pub fn transaction_id(headers: &HeaderMap) -> String {
    headers
        .get(TRANSACTION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("tid_{}", Uuid::new_v4().simple()))
}
