//! Axum extractors for authentication and rate limiting.

use crate::auth::session::resolve_session;
use crate::config::Config;
use crate::error::AppError;
use crate::ledger::LedgerClient;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
};
use redis::AsyncCommands;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub redis: redis::Client,
    pub config: Arc<Config>,
    pub ledger: Arc<dyn LedgerClient>,
}

/// Authenticated wallet extractor.
///
/// Extracts and verifies the session token from `Authorization: Bearer {token}`.
/// Stateless: no storage lookup, validity is signature + expiry only.
/// Returns 401 Unauthorized if missing or invalid.
pub struct AuthWallet {
    pub wallet_address: String,
}

impl FromRequestParts<AppState> for AuthWallet {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Extract Authorization header
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

        // Parse Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".to_string()))?;

        let wallet_address = resolve_session(token, &state.config.jwt_secret)?;

        Ok(AuthWallet { wallet_address })
    }
}

/// Optional extraction: `Option<AuthWallet>` yields Some for a valid auth
/// header and None otherwise, without failing the request.
impl OptionalFromRequestParts<AppState> for AuthWallet {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <AuthWallet as FromRequestParts<AppState>>::from_request_parts(parts, state).await {
            Ok(wallet) => Ok(Some(wallet)),
            Err(_) => Ok(None),
        }
    }
}

/// Check rate limit using Redis INCR with TTL.
///
/// # Arguments
/// * `con` - Redis connection
/// * `key` - Rate limit key (e.g., "ratelimit:auth:127.0.0.1")
/// * `max` - Maximum requests allowed in window
/// * `window_secs` - Time window in seconds
///
/// # Returns
/// * `Ok(true)` if under limit
/// * `Ok(false)` if limit exceeded
pub async fn check_rate_limit<C>(
    con: &mut C,
    key: &str,
    max: u32,
    window_secs: u64,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    // Increment counter
    let count: u32 = con.incr(key, 1).await?;

    // Set TTL on first request
    if count == 1 {
        con.expire::<_, ()>(key, window_secs as i64).await?;
    }

    Ok(count <= max)
}
