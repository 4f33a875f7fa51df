//! Challenge message construction and nonce generation.

use base64::{engine::general_purpose, Engine as _};
use rand::Rng;

/// Generate a cryptographically random challenge nonce.
///
/// Returns a base64-encoded string (44 characters) from 32 random bytes.
/// Guessing a nonce within the challenge TTL is infeasible at this entropy.
pub fn generate_challenge_nonce() -> String {
    let mut rng = rand::rng();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    general_purpose::STANDARD.encode(bytes)
}

/// Render the fixed login message a wallet must sign.
///
/// The server stores this exact string and verifies the signature against
/// its stored copy, never against a client-echoed message.
pub fn challenge_message(nonce: &str) -> String {
    format!(
        "Welcome to Fanlock! Please sign this message to log in. Nonce: {}",
        nonce
    )
}
