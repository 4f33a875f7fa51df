//! Stateless session tokens (HS256 JWT).
//!
//! A session binds a wallet address to a 24-hour expiry, signed with the
//! server secret. There is no server-side session table and no revocation;
//! validity is solely a function of signature and expiry.

use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Payload stored in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Base58 wallet address the session is bound to.
    pub wallet_address: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

fn unix_now() -> Result<u64, AppError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| AppError::Internal(format!("System time error: {}", e)))
}

/// Mint a signed session token for an authenticated wallet.
pub fn issue_session(wallet_address: &str, secret: &str, ttl_secs: u64) -> Result<String, AppError> {
    let now = unix_now()?;

    let claims = Claims {
        wallet_address: wallet_address.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to issue session token: {}", e)))
}

/// Verify a session token and return the wallet address it is bound to.
///
/// Every failure mode (bad signature, expired, malformed) collapses into
/// `Unauthorized` so that responses form no validity oracle; the specific
/// reason is kept in the debug log only.
pub fn resolve_session(token: &str, secret: &str) -> Result<String, AppError> {
    // No clock tolerance: a session is invalid the second it expires
    let mut validation = Validation::default();
    validation.leeway = 0;

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims.wallet_address),
        Err(err) => {
            tracing::debug!(reason = %err, "Session token rejected");
            Err(AppError::Unauthorized("Invalid token".to_string()))
        }
    }
}
