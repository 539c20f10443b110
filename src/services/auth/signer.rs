//! Token minting for fixtures and tooling. Not used on the request path.

use std::time::Duration;

use jsonwebtoken::{EncodingKey, Header};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::services::auth::access_jwt::ALGORITHM;

#[derive(Debug, Error)]
pub enum SignError {
    #[error("invalid RSA private key PEM: {0}")]
    Key(#[source] jsonwebtoken::errors::Error),
    #[error("failed to serialize claims: {0}")]
    Claims(#[from] serde_json::Error),
    #[error("claims must serialize to a JSON object")]
    NotAnObject,
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

/// RS256 signer.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenSigner")
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// `private_key_pem` must be an RSA private key (PKCS#1 or PKCS#8 PEM).
    pub fn new(private_key_pem: &str) -> Result<Self, SignError> {
        let encoding_key =
            EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).map_err(SignError::Key)?;

        Ok(Self { encoding_key })
    }

    /// Sign `claims`, stamping `iat` with now and `exp` with now + `ttl`.
    ///
    /// Any `iat`/`exp` already present in `claims` is overwritten.
    pub fn sign<T: Serialize>(&self, claims: &T, ttl: Duration) -> Result<String, SignError> {
        let Value::Object(mut claims) = serde_json::to_value(claims)? else {
            return Err(SignError::NotAnObject);
        };

        let now = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        claims.insert("iat".to_string(), Value::from(now));
        claims.insert("exp".to_string(), Value::from(now.saturating_add(ttl)));

        let mut header = Header::new(ALGORITHM);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(SignError::Sign)
    }
}

/// One-shot form of [`TokenSigner::sign`].
pub fn sign_token<T: Serialize>(
    claims: &T,
    private_key_pem: &str,
    ttl: Duration,
) -> Result<String, SignError> {
    TokenSigner::new(private_key_pem)?.sign(claims, ttl)
}
