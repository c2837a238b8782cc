use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for FizzBuzz operations
#[derive(Debug, Error)]
pub enum FizzBuzzError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No requests found in the statistics")]
    NoRequestsFound,

    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Corrupt entry: {0}")]
    CorruptEntry(String),

    #[error("Request timed out after {0}ms")]
    Timeout(u64),
}

impl FizzBuzzError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidParameters(_) | Self::InvalidPayload(_) | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NoRequestsFound => StatusCode::NOT_FOUND,
            Self::CacheUnavailable(_) | Self::StoreUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::CorruptEntry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameters(_) => "invalid_parameters",
            Self::InvalidPayload(_) => "invalid_payload",
            Self::InvalidRequest(_) => "invalid_request",
            Self::NoRequestsFound => "no_requests_found",
            Self::CacheUnavailable(_) => "cache_unavailable",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::CorruptEntry(_) => "corrupt_entry",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Implement IntoResponse for Axum integration
impl IntoResponse for FizzBuzzError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "code": self.code(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type alias for FizzBuzz operations
pub type Result<T> = std::result::Result<T, FizzBuzzError>;
