//! Random token generation and token fingerprinting.

use crate::error::AppError;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Generates `len` cryptographically secure random bytes, hex-encoded.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_hex_token(len: usize) -> Result<String, AppError> {
    let mut buffer = vec![0u8; len];

    getrandom::fill(&mut buffer).map_err(|e| {
        tracing::error!(error = %e, "System RNG failure");
        AppError::internal("Failed to generate random token", json!({}))
    })?;

    Ok(hex::encode(buffer))
}

/// Keyed HMAC-SHA256 fingerprint of `token`, as 64 lowercase hex characters.
///
/// Used to store bearer tokens so that a read-only database leak cannot be
/// replayed without the server secret.
pub fn fingerprint(secret: &str, token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Unkeyed SHA-256 digest of `token`, as 64 lowercase hex characters.
pub fn sha256_hex(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
