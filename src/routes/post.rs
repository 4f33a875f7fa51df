//! Post API endpoints: creation, viewer-aware reads, purchase verification.

use crate::auth::middleware::{AppState, AuthWallet};
use crate::error::AppError;
use crate::models::{
    CreatePostRequest, StoredPost, VerifyPurchaseRequest, VerifyPurchaseResponse,
};
use crate::purchase;
use crate::storage;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// POST /api/posts — Create a locked post (authenticated).
pub async fn create_post(
    wallet: AuthWallet,
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.image_url.is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }
    if !req.price.is_finite() || req.price <= 0.0 {
        return Err(AppError::BadRequest(
            "Price must be a positive amount".to_string(),
        ));
    }

    let mut con = state.redis.get_multiplexed_async_connection().await?;

    let post = StoredPost {
        id: nanoid::nanoid!(12),
        creator_wallet: wallet.wallet_address.clone(),
        image_url: req.image_url,
        description: req.description,
        price: req.price,
        created_at: storage::unix_now(),
    };
    storage::post::store_post(&mut con, &post).await?;

    tracing::info!(action = "post_created", post_id = %post.id, creator = %post.creator_wallet, "Post created");

    // The creator sees their own image URL
    Ok((
        StatusCode::CREATED,
        Json(post.view_for(Some(&wallet.wallet_address), false)),
    ))
}

/// GET /api/posts/{id} — Fetch a post; the image URL is revealed only to
/// the creator or a buyer with a purchase record.
pub async fn get_post(
    viewer: Option<AuthWallet>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis.get_multiplexed_async_connection().await?;

    let post = storage::post::get_post(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let viewer_wallet = viewer.map(|w| w.wallet_address);
    let is_purchased = match &viewer_wallet {
        Some(wallet) => storage::purchase::has_purchased(&mut con, wallet, &post.id).await?,
        None => false,
    };

    Ok(Json(post.view_for(viewer_wallet.as_deref(), is_purchased)))
}

/// GET /api/creators/{wallet}/posts — List a creator's posts, newest first,
/// with per-post unlock state for the viewer.
pub async fn list_creator_posts(
    viewer: Option<AuthWallet>,
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis.get_multiplexed_async_connection().await?;

    let posts = storage::post::list_creator_posts(&mut con, &wallet).await?;
    let viewer_wallet = viewer.map(|w| w.wallet_address);

    let mut views = Vec::with_capacity(posts.len());
    for post in posts {
        let is_purchased = match &viewer_wallet {
            Some(w) => storage::purchase::has_purchased(&mut con, w, &post.id).await?,
            None => false,
        };
        views.push(post.view_for(viewer_wallet.as_deref(), is_purchased));
    }

    Ok(Json(views))
}

/// POST /api/posts/verify-purchase — Verify an on-chain payment and record
/// the purchase (authenticated). Replays surface as 409 Conflict.
pub async fn verify_purchase(
    wallet: AuthWallet,
    State(state): State<AppState>,
    Json(req): Json<VerifyPurchaseRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.post_id.is_empty() || req.transaction_signature.is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }

    let mut con = state.redis.get_multiplexed_async_connection().await?;

    let record = purchase::verify_purchase(
        &mut con,
        state.ledger.as_ref(),
        &wallet.wallet_address,
        &req.post_id,
        &req.transaction_signature,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(VerifyPurchaseResponse {
            success: true,
            purchase: record,
        }),
    ))
}
