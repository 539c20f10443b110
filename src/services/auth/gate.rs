//! Per-request authentication decision.
//!
//! Checks run in a fixed order and stop at the first failure:
//! sticky key fault, header, bearer token, key, signature/claims, issuer.

use std::path::PathBuf;

use axum::http::{HeaderMap, StatusCode, header};
use tracing::{debug, warn};

use crate::error::{Denial, GateError};
use crate::services::auth::{
    access_jwt::{DEFAULT_LEEWAY_SECONDS, DecodedClaims, TokenVerifier},
    bearer,
    issuer::IssuerPolicy,
    key_store::{KeyLocation, KeyState, KeyStore},
};

/// Everything the gate needs, resolved by the caller before construction.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Public key file path set in code or configuration.
    pub key_path: Option<PathBuf>,
    /// Environment-style override, used when `key_path` is unset.
    pub key_path_override: Option<PathBuf>,
    /// Expected `iss`; `None` disables the issuer check.
    pub expected_issuer: Option<String>,
    pub leeway_seconds: u64,
    /// Non-production mode: a deduced key path that failed to load is
    /// reported as 203 with the path in the reason.
    pub diagnostics: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            key_path: None,
            key_path_override: None,
            expected_issuer: None,
            leeway_seconds: DEFAULT_LEEWAY_SECONDS,
            diagnostics: false,
        }
    }
}

#[derive(Debug)]
pub struct Gate {
    keys: KeyStore,
    verifier: TokenVerifier,
    issuer: IssuerPolicy,
    diagnostics: bool,
}

impl Gate {
    pub fn new(config: GateConfig) -> Self {
        let location = KeyLocation::resolve(config.key_path, config.key_path_override);

        Self::with_key_store(
            KeyStore::new(location),
            IssuerPolicy::new(config.expected_issuer),
            config.leeway_seconds,
            config.diagnostics,
        )
    }

    pub fn with_key_store(
        keys: KeyStore,
        issuer: IssuerPolicy,
        leeway_seconds: u64,
        diagnostics: bool,
    ) -> Self {
        Self {
            keys,
            verifier: TokenVerifier::new(leeway_seconds),
            issuer,
            diagnostics,
        }
    }

    pub fn key_location(&self) -> &KeyLocation {
        self.keys.location()
    }

    pub fn key_state(&self) -> KeyState {
        self.keys.state()
    }

    /// Acquire the key ahead of the first request.
    pub async fn warm_up(&self) -> KeyState {
        // Outcome is cached in the store; the state reports it.
        let _ = self.keys.acquire().await;
        self.keys.state()
    }

    /// Decide whether the request carrying `headers` may pass.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<DecodedClaims, GateError> {
        if let Some(fault) = self.keys.fault() {
            debug!(%fault, "rejecting request: key source previously failed");
            return Err(GateError::KeyMalfunctioned {
                fault: fault.clone(),
            });
        }

        let value = headers
            .get(header::AUTHORIZATION)
            .filter(|v| !v.is_empty())
            .ok_or(GateError::MissingHeader)?;

        let token = value
            .to_str()
            .ok()
            .and_then(bearer::extract)
            .ok_or(GateError::MissingBearer)?;

        let key = match self.keys.acquire().await {
            Ok(key) => key,
            Err(unavailable) if unavailable.first => {
                return Err(GateError::KeyMalfunction {
                    fault: unavailable.fault,
                });
            }
            Err(unavailable) => {
                return Err(GateError::KeyMalfunctioned {
                    fault: unavailable.fault,
                });
            }
        };

        let claims = self.verifier.verify(token, &key).map_err(|err| {
            warn!(error = %err, "bearer token verification failed");
            GateError::InvalidToken
        })?;

        self.issuer.check(&claims).map_err(|err| {
            warn!(error = %err, sub = %claims.sub, "bearer token issuer rejected");
            GateError::InvalidIssuer
        })?;

        Ok(claims)
    }

    /// Denial to send for `err`.
    pub fn deny(&self, err: &GateError) -> Denial {
        if let Some(fault) = err.key_fault() {
            if self.diagnostics && fault.location().is_deduced() {
                return Denial::new(
                    format!(
                        "Public Key File Path Implicit: {}",
                        fault.location().path().display()
                    ),
                    StatusCode::NON_AUTHORITATIVE_INFORMATION,
                );
            }
        }

        Denial::from(err)
    }
}
