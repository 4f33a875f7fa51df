//! Fanlock application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Connect to Redis
//! 3. Build the ledger RPC client
//! 4. Build router with API routes
//! 5. Apply security headers middleware
//! 6. Start Axum server
//!
//! Also supports a `keygen` subcommand for generating wallet keypairs.

use fanlock::{
    auth::middleware::AppState, config::Config, ledger::RpcLedgerClient,
    middleware::security_headers, routes,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Generate a fresh Ed25519 wallet keypair for development clients.
///
/// Prints the base58 wallet address and the base64 seed.
fn keygen() {
    use ed25519_dalek::SigningKey;

    let mut seed = [0u8; 32];
    rand::fill(&mut seed);
    let signing_key = SigningKey::from_bytes(&seed);

    let wallet = bs58::encode(signing_key.verifying_key().as_bytes()).into_string();
    let secret = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, seed);

    seed.fill(0);

    println!("wallet:  {}", wallet);
    println!("seed:    {}", secret);
}

#[tokio::main]
async fn main() {
    // Check for keygen subcommand
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "keygen" {
        keygen();
        return;
    }

    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!("Starting fanlock on {}", config.bind_addr);

    // Connect to Redis
    let redis_client = redis::Client::open(config.redis_url.as_str()).expect("Invalid Redis URL");

    // Verify Redis connection up front
    redis_client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");

    // Ledger client against the configured RPC endpoint
    let ledger = Arc::new(RpcLedgerClient::new(config.rpc_url.clone()));
    tracing::info!("Ledger RPC endpoint: {}", config.rpc_url);

    // Build shared state
    let state = AppState {
        redis: redis_client,
        config: Arc::new(config.clone()),
        ledger,
    };

    // Explicit CORS: single-origin deployment. CorsLayer::new() allows no
    // origins, so responses carry no allow-origin headers and browsers
    // refuse cross-origin reads.
    let cors = CorsLayer::new();

    let app = routes::api_router()
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", config.bind_addr);

    // Start server (with_connect_info required for ConnectInfo<SocketAddr> extractors)
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
