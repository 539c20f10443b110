//! Bearer-token authentication gate for axum routers.
//!
//! Requests must carry `Authorization: Bearer <RS256 JWT>`. The token is
//! verified against a public key read once from disk, its issuer optionally
//! checked, and the verified subject forwarded downstream as
//! `x-api-client-id`. Anything else is refused with
//! `{"description": "ACCESS DENIED: <reason>"}`.
//!
//! ```ignore
//! let gate = Arc::new(Gate::new(GateConfig {
//!     key_path: Some("config/jwt.pem.pub".into()),
//!     expected_issuer: Some("https://api.example.org/".into()),
//!     ..GateConfig::default()
//! }));
//! let app = bearer_gate::middleware::auth::apply(Router::new().route("/", get(handler)), gate);
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use error::{Denial, GateError};
pub use middleware::auth::{CLIENT_ID_HEADER, apply};
pub use services::auth::{DecodedClaims, Gate, GateConfig, KeyState, sign_token};
