/*
 * Responsibility
 * - GET /health (疎通用, gate を通さない)
 * - key store の状態 (pending / ready / faulted) を返す
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::services::auth::KeyState;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let key = state.gate.key_state();
    let status = match key {
        KeyState::Faulted => StatusCode::SERVICE_UNAVAILABLE,
        KeyState::Pending | KeyState::Ready => StatusCode::OK,
    };

    (status, Json(json!({"status": "ok", "key": key})))
}
