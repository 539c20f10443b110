//! Verification key acquisition and caching.
//!
//! The key is read from a PEM file at most once per `KeyStore`. Whatever the
//! first read produces, key or fault, is what every later caller sees: a
//! failed read is never retried until the process restarts.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonwebtoken::DecodingKey;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{error, info};

const DEFAULT_KEY_DIR: &str = "config";
const DEFAULT_KEY_FILE: &str = "jwt.pem.pub";
const INLINE_KEY_LOCATION: &str = "<inline>";

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read public key file: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid RSA public key PEM: {0}")]
    Parse(#[from] jsonwebtoken::errors::Error),
}

/// Where the verification key is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLocation {
    path: PathBuf,
    deduced: bool,
}

impl KeyLocation {
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            deduced: false,
        }
    }

    /// `<directory of the running executable>/config/jwt.pem.pub`.
    pub fn deduced() -> Self {
        let base = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            path: base.join(DEFAULT_KEY_DIR).join(DEFAULT_KEY_FILE),
            deduced: true,
        }
    }

    /// Explicit configuration wins over the environment override, which wins
    /// over the deduced default. Empty paths count as unset.
    pub fn resolve(explicit: Option<PathBuf>, override_path: Option<PathBuf>) -> Self {
        explicit
            .into_iter()
            .chain(override_path)
            .find(|p| !p.as_os_str().is_empty())
            .map(Self::explicit)
            .unwrap_or_else(Self::deduced)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_deduced(&self) -> bool {
        self.deduced
    }
}

/// RSA public key used to check token signatures.
///
/// Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct VerificationKey(Arc<DecodingKey>);

impl VerificationKey {
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())?;
        Ok(Self(Arc::new(key)))
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.0
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationKey(..)")
    }
}

/// Sticky record of a failed key acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFault {
    location: KeyLocation,
    detail: String,
}

impl KeyFault {
    pub fn location(&self) -> &KeyLocation {
        &self.location
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for KeyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "public key unavailable at {} ({}): {}",
            self.location.path.display(),
            if self.location.deduced {
                "deduced"
            } else {
                "configured"
            },
            self.detail
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyState {
    Pending,
    Ready,
    Faulted,
}

/// Returned by [`KeyStore::acquire`] when no key can be had.
///
/// `first` is true only for the caller whose attempt performed the failing
/// read; waiters that shared that attempt and all later callers see `false`.
#[derive(Debug, Clone)]
pub struct Unavailable {
    pub fault: KeyFault,
    pub first: bool,
}

pub struct KeyStore {
    location: KeyLocation,
    slot: OnceCell<Result<VerificationKey, KeyFault>>,
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("location", &self.location)
            .field("state", &self.state())
            .finish()
    }
}

impl KeyStore {
    pub fn new(location: KeyLocation) -> Self {
        Self {
            location,
            slot: OnceCell::new(),
        }
    }

    /// Store that is ready from the start, for key material already in memory.
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        let key = VerificationKey::from_pem(pem.trim())?;
        Ok(Self {
            location: KeyLocation::explicit(INLINE_KEY_LOCATION),
            slot: OnceCell::from(Ok(key)),
        })
    }

    pub fn location(&self) -> &KeyLocation {
        &self.location
    }

    pub fn state(&self) -> KeyState {
        match self.slot.get() {
            None => KeyState::Pending,
            Some(Ok(_)) => KeyState::Ready,
            Some(Err(_)) => KeyState::Faulted,
        }
    }

    /// Peek at the sticky fault without waiting on an in-flight read.
    pub fn fault(&self) -> Option<&KeyFault> {
        self.slot.get().and_then(|outcome| outcome.as_ref().err())
    }

    /// Returns the cached key, reading it on first use.
    ///
    /// Concurrent first callers share a single read.
    pub async fn acquire(&self) -> Result<VerificationKey, Unavailable> {
        let mut first = false;
        let outcome = self
            .slot
            .get_or_init(|| {
                first = true;
                self.load()
            })
            .await;

        match outcome {
            Ok(key) => Ok(key.clone()),
            Err(fault) => Err(Unavailable {
                fault: fault.clone(),
                first,
            }),
        }
    }

    async fn load(&self) -> Result<VerificationKey, KeyFault> {
        let path = self.location.path();

        match read_key(path).await {
            Ok(key) => {
                info!(
                    path = %path.display(),
                    deduced = self.location.is_deduced(),
                    "loaded token verification key"
                );
                Ok(key)
            }
            Err(err) => {
                error!(
                    path = %path.display(),
                    deduced = self.location.is_deduced(),
                    error = %err,
                    "public key unavailable; authentication disabled until restart"
                );
                Err(KeyFault {
                    location: self.location.clone(),
                    detail: err.to_string(),
                })
            }
        }
    }
}

async fn read_key(path: &Path) -> Result<VerificationKey, KeyError> {
    let pem = tokio::fs::read_to_string(path).await?;
    VerificationKey::from_pem(pem.trim())
}
