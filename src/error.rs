//! Error types and Axum response conversions.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error taxonomy.
///
/// Every domain outcome a handler can surface maps to exactly one variant;
/// `Unavailable` is the only kind a client may retry without changing input.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Internal error: {0}")]
    Internal(String),

    /// Malformed input. The client must fix the request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No outstanding challenge for this wallet. The client must restart
    /// the login flow. Covers "never requested", "already consumed", and
    /// "process restarted" uniformly.
    #[error("Invalid or expired login challenge")]
    ChallengeExpired,

    /// Signature or session credential failed verification.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// On-chain transaction exists but does not pay for this item
    /// (wrong parties or wrong amount). Not retryable with the same reference.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// A purchase record for this (buyer, item) pair already exists.
    /// Idempotent terminal state, surfaced as a conflict.
    #[error("This item has already been purchased")]
    AlreadyPurchased,

    /// Transient storage or ledger failure. Safe to retry.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Rate limited")]
    RateLimited,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Internal(msg) => {
                // Log detailed error server-side, return generic message to client
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ChallengeExpired => (
                StatusCode::BAD_REQUEST,
                "Invalid or expired login challenge. Please try again.".to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidTransaction(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::AlreadyPurchased => (
                StatusCode::CONFLICT,
                "This item has already been purchased.".to_string(),
            ),
            AppError::Unavailable(msg) => {
                // Driver details stay in the log; the client sees a generic retryable error
                tracing::warn!(error = %msg, "Service unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                )
            }
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// Convenience conversions from common error types
impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Unavailable(format!("Redis error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl From<crate::ledger::LedgerError> for AppError {
    fn from(err: crate::ledger::LedgerError) -> Self {
        AppError::Unavailable(format!("Ledger error: {}", err))
    }
}
