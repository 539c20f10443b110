//! Sample protected handlers. They only run once the gate let the request through.

use axum::{
    Json,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::json;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::middleware::auth::CLIENT_ID_HEADER;

/// Reads the identity from the `x-api-client-id` header set by the gate.
pub async fn hello(headers: HeaderMap) -> impl IntoResponse {
    let client_id = headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(json!({"status": "awesome :)", "client_id": client_id})),
    )
}

/// Same as [`hello`] but answers 202 and takes the typed `AuthCtx`.
pub async fn hello_accepted(AuthCtxExtractor(ctx): AuthCtxExtractor) -> impl IntoResponse {
    (
        StatusCode::ACCEPTED,
        Json(json!({"status": "awesome :)", "client_id": ctx.client_id})),
    )
}
