//! API route handlers.

pub mod auth;
pub mod post;

use crate::auth::middleware::AppState;
use axum::{routing::get, routing::post, Router};

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(health))
        // Auth endpoints
        .route("/api/auth/challenge", post(auth::request_challenge))
        .route("/api/auth/verify", post(auth::verify_challenge))
        // Post endpoints
        .route("/api/posts", post(post::create_post))
        .route("/api/posts/{id}", get(post::get_post))
        .route("/api/posts/verify-purchase", post(post::verify_purchase))
        .route("/api/creators/{wallet}/posts", get(post::list_creator_posts))
}

async fn health() -> &'static str {
    "Backend is healthy!"
}
