//! Signed bearer tokens (HS256 JWT).

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AuthError};
use crate::utils::secure_token::generate_hex_token;

/// Random bytes in the `jti` claim.
const JTI_BYTES: usize = 16;

/// Claims carried by every bearer token.
///
/// `jti` is absent on tokens minted before it was introduced; those still
/// verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub email: String,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl TokenClaims {
    /// Builds claims for a token issued at `issued_at` living for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the random `jti` cannot be generated.
    pub fn new(
        user_id: i64,
        email: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, AppError> {
        Ok(Self {
            user_id,
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            jti: Some(generate_hex_token(JTI_BYTES)?),
        })
    }

    /// The `exp` claim as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Signs and verifies bearer tokens with a shared secret.
///
/// Verification checks the signature and requires an `exp` claim but does not
/// reject elapsed tokens: the session record decides expiry.
#[derive(Clone)]
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Encodes and signs `claims`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if encoding fails.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            AppError::internal("Failed to issue token", json!({}))
        })
    }

    /// Verifies the signature of `token` and decodes its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidSignature`] for any signature, format or
    /// claim decoding failure. The underlying cause is only logged.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AuthError::InvalidSignature
            })
    }
}
