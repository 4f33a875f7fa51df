//! Auth API endpoints: challenge issuance and signature verification.

use crate::auth::middleware::{check_rate_limit, AppState};
use crate::auth::{challenge_message, generate_challenge_nonce, issue_session, verify_signature};
use crate::auth::verify::decode_wallet_address;
use crate::error::AppError;
use crate::models::{
    ChallengeRequest, ChallengeResponse, StoredChallenge, VerifyRequest, VerifyResponse,
};
use crate::storage;
use axum::{
    extract::{ConnectInfo, State},
    response::IntoResponse,
    Json,
};
use std::net::SocketAddr;

/// POST /api/auth/challenge — Issue a login challenge for a wallet.
///
/// Upserts the wallet identity (first challenge request creates it) and
/// stores a fresh challenge message, invalidating any prior one.
pub async fn request_challenge(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<ChallengeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.wallet_address.is_empty() {
        return Err(AppError::BadRequest(
            "Wallet address is required".to_string(),
        ));
    }
    // Reject garbage addresses before touching storage
    decode_wallet_address(&req.wallet_address)?;

    let mut con = state.redis.get_multiplexed_async_connection().await?;

    // Rate limit by IP
    let rate_limit_key = format!("ratelimit:auth:{}", addr.ip());
    let allowed = check_rate_limit(
        &mut con,
        &rate_limit_key,
        state.config.rate_limit_auth_per_min,
        60,
    )
    .await?;

    if !allowed {
        tracing::warn!(action = "rate_limited", endpoint = "auth/challenge", "Rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    // Find-or-create the identity record
    storage::wallet::upsert_wallet(&mut con, &req.wallet_address).await?;

    let nonce = generate_challenge_nonce();
    let message = challenge_message(&nonce);

    // Overwrites any outstanding challenge: only the latest is ever valid
    let challenge = StoredChallenge {
        message: message.clone(),
        created_at: storage::unix_now(),
    };
    storage::challenge::store_challenge(
        &mut con,
        &req.wallet_address,
        &challenge,
        state.config.challenge_ttl_secs,
    )
    .await?;

    Ok(Json(ChallengeResponse { message }))
}

/// POST /api/auth/verify — Verify a signed challenge and issue a session.
pub async fn verify_challenge(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis.get_multiplexed_async_connection().await?;

    // Take the challenge before any other work: single-use, successful or not
    let challenge = storage::challenge::take_challenge(&mut con, &req.wallet_address)
        .await?
        .ok_or(AppError::ChallengeExpired)?;

    // Verify against the server-held message, never a client-echoed copy
    let valid = verify_signature(
        &req.wallet_address,
        challenge.message.as_bytes(),
        &req.signature,
    )?;

    if !valid {
        tracing::warn!(action = "auth_failed", wallet = %req.wallet_address, "Invalid signature");
        return Err(AppError::Unauthorized(
            "Signature verification failed.".to_string(),
        ));
    }

    let token = issue_session(
        &req.wallet_address,
        &state.config.jwt_secret,
        state.config.session_ttl_secs,
    )?;

    tracing::info!(action = "auth_success", wallet = %req.wallet_address, "Wallet authenticated");

    Ok(Json(VerifyResponse { token }))
}
