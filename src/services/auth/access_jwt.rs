use jsonwebtoken::{Algorithm, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::auth::key_store::VerificationKey;

/// The only algorithm tokens may be signed with. Never negotiated from the
/// token header.
pub const ALGORITHM: Algorithm = Algorithm::RS256;

pub const DEFAULT_LEEWAY_SECONDS: u64 = 60;

#[derive(Debug, Error)]
#[error("jwt verification failed: {0}")]
pub struct VerifyError(#[from] jsonwebtoken::errors::Error);

/// Claims of a verified bearer token.
///
/// Only `iss` and `sub` are interpreted; everything else rides along in
/// `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub sub: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// RS256 signature and time-claim verifier.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    validation: Validation,
}

impl Default for TokenVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_LEEWAY_SECONDS)
    }
}

impl TokenVerifier {
    pub fn new(leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = leeway_seconds;
        // `exp`/`nbf` are checked when present, never required.
        validation.validate_nbf = true;
        validation.required_spec_claims.clear();
        // Audience is not part of this gate's policy; issuer is checked separately
        // so that a mismatch can be reported on its own.
        validation.validate_aud = false;

        Self { validation }
    }

    /// Verify the signature with `key` and decode the claims.
    pub fn verify(&self, token: &str, key: &VerificationKey) -> Result<DecodedClaims, VerifyError> {
        let data =
            jsonwebtoken::decode::<DecodedClaims>(token, key.decoding_key(), &self.validation)?;

        Ok(data.claims)
    }
}
