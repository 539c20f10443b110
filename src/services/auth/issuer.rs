use thiserror::Error;

use crate::services::auth::access_jwt::DecodedClaims;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("issuer {actual:?} does not match expected issuer {expected:?}")]
pub struct IssuerMismatch {
    pub expected: String,
    pub actual: Option<String>,
}

/// Opt-in exact match on the `iss` claim.
#[derive(Debug, Clone, Default)]
pub struct IssuerPolicy {
    expected: Option<String>,
}

impl IssuerPolicy {
    /// `None` (or an empty string) disables the check.
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.filter(|iss| !iss.is_empty()),
        }
    }

    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }

    pub fn check(&self, claims: &DecodedClaims) -> Result<(), IssuerMismatch> {
        let Some(expected) = &self.expected else {
            return Ok(());
        };

        if claims.iss.as_deref() == Some(expected.as_str()) {
            Ok(())
        } else {
            Err(IssuerMismatch {
                expected: expected.clone(),
                actual: claims.iss.clone(),
            })
        }
    }
}
