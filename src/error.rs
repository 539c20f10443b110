/*
 * Responsibility
 * - Reasons a request is refused at the gate (GateError)
 * - The uniform denial payload and its IntoResponse impl (Denial)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::key_store::KeyFault;

const DENIAL_PREFIX: &str = "ACCESS DENIED";

/// Why the gate refused a request. `Display` is the caller-facing reason.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Authorization header missing.")]
    MissingHeader,
    #[error("Bearer token missing or invalid in the Authorization header")]
    MissingBearer,
    #[error("Malformed or invalid Bearer token")]
    InvalidToken,
    #[error("Invalid Issuer")]
    InvalidIssuer,
    /// This request's key read failed.
    #[error("Authentication Malfunction")]
    KeyMalfunction { fault: KeyFault },
    /// The key read failed earlier; nothing was attempted for this request.
    #[error("Authentication Malfunctioned")]
    KeyMalfunctioned { fault: KeyFault },
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::MissingHeader
            | GateError::MissingBearer
            | GateError::InvalidToken
            | GateError::InvalidIssuer => StatusCode::FORBIDDEN,
            GateError::KeyMalfunction { .. } | GateError::KeyMalfunctioned { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn key_fault(&self) -> Option<&KeyFault> {
        match self {
            GateError::KeyMalfunction { fault } | GateError::KeyMalfunctioned { fault } => {
                Some(fault)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct DenialBody {
    description: String,
}

/// Rejection sent back instead of calling the downstream handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    reason: String,
    status: StatusCode,
}

impl Denial {
    pub fn new(reason: impl Into<String>, status: StatusCode) -> Self {
        Self {
            reason: reason.into(),
            status,
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::new(reason, StatusCode::FORBIDDEN)
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn description(&self) -> String {
        if self.reason.is_empty() {
            DENIAL_PREFIX.to_string()
        } else {
            format!("{DENIAL_PREFIX}: {}", self.reason)
        }
    }
}

impl From<&GateError> for Denial {
    fn from(err: &GateError) -> Self {
        Self::new(err.to_string(), err.status())
    }
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        let body = DenialBody {
            description: self.description(),
        };

        (self.status, Json(body)).into_response()
    }
}
