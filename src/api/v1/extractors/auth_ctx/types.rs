use crate::services::auth::DecodedClaims;

/// Identity of a request that passed the bearer gate.
///
/// - `client_id` is the verified `sub`, the same value sent downstream in
///   `x-api-client-id`
/// - `claims` holds everything else from the token, unvalidated
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub client_id: String,
    pub issuer: Option<String>,
    pub claims: serde_json::Map<String, serde_json::Value>,
}

impl From<DecodedClaims> for AuthCtx {
    fn from(claims: DecodedClaims) -> Self {
        Self {
            client_id: claims.sub,
            issuer: claims.iss,
            claims: claims.extra,
        }
    }
}
