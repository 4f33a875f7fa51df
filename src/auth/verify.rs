//! Ed25519 signature verification for wallet login.

use crate::error::AppError;
use base64::{engine::general_purpose, Engine as _};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Decode a base58 wallet address into its raw Ed25519 public key bytes.
///
/// Fails with `BadRequest` if the address is not base58 or does not decode
/// to exactly 32 bytes — garbage input, distinct from a wrong-key signature.
pub fn decode_wallet_address(wallet_address: &str) -> Result<[u8; 32], AppError> {
    let bytes = bs58::decode(wallet_address)
        .into_vec()
        .map_err(|e| AppError::BadRequest(format!("Invalid wallet address: {}", e)))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        AppError::BadRequest(format!(
            "Invalid wallet address length: expected 32 bytes, got {}",
            v.len()
        ))
    })
}

/// Verify an Ed25519 signature over a message.
///
/// # Arguments
/// * `wallet_address` - Base58-encoded public key (32 bytes)
/// * `message` - The message bytes that were signed
/// * `signature_base64` - Base64-encoded detached signature (64 bytes)
///
/// # Returns
/// * `Ok(true)` if the signature is valid
/// * `Ok(false)` if the signature is cryptographically invalid
/// * `Err(AppError::BadRequest)` if either encoding is malformed
pub fn verify_signature(
    wallet_address: &str,
    message: &[u8],
    signature_base64: &str,
) -> Result<bool, AppError> {
    let pubkey_bytes = decode_wallet_address(wallet_address)?;

    // Decode signature from base64
    let signature_bytes = general_purpose::STANDARD
        .decode(signature_base64)
        .map_err(|e| AppError::BadRequest(format!("Invalid signature base64: {}", e)))?;

    let signature_array: [u8; 64] = signature_bytes.try_into().map_err(|v: Vec<u8>| {
        AppError::BadRequest(format!(
            "Invalid signature length: expected 64 bytes, got {}",
            v.len()
        ))
    })?;

    // Not every 32-byte string is a valid curve point
    let verifying_key = VerifyingKey::from_bytes(&pubkey_bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid public key: {}", e)))?;

    let signature = Signature::from_bytes(&signature_array);

    // Verify signature (constant-time comparison is built into ed25519-dalek)
    match verifying_key.verify(message, &signature) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}
