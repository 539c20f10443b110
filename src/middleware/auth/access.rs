//! Bearer gate middleware: authorize → annotate → next.
//!
//! On success the request reaches the next handler with exactly one header
//! added (or overwritten): `x-api-client-id: <verified sub>`. The verified
//! claims also ride along as an [`AuthCtx`] extension. On failure the
//! downstream handler is never called.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::{Denial, GateError};
use crate::services::auth::Gate;

pub const CLIENT_ID_HEADER: &str = "x-api-client-id";

/// Put `gate` in front of every route of `router`.
///
/// ```ignore
/// let protected = Router::new().route("/hello", any(hello));
/// let protected = middleware::auth::apply(protected, gate.clone());
/// ```
pub fn apply<S>(router: Router<S>, gate: Arc<Gate>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // The gate is the middleware's own state, so any router state works.
    router.layer(middleware::from_fn_with_state(gate, access_middleware))
}

async fn access_middleware(
    State(gate): State<Arc<Gate>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Denial> {
    let claims = gate
        .authorize(req.headers())
        .await
        .map_err(|err| gate.deny(&err))?;

    let client_id = HeaderValue::from_str(&claims.sub).map_err(|_| {
        tracing::warn!("verified subject is not a valid header value");
        gate.deny(&GateError::InvalidToken)
    })?;

    req.headers_mut()
        .insert(HeaderName::from_static(CLIENT_ID_HEADER), client_id);
    req.extensions_mut().insert(AuthCtx::from(claims));

    Ok(next.run(req).await)
}
