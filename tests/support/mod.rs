#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bearer_gate::{
    Gate, GateConfig, app,
    middleware::http::HttpLimits,
    services::auth::sign_token,
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ISSUER: &str = "https://api.example.org/";
pub const SUBJECT: &str = "ab7f1968-0c40-4f67-9ae7-67b9dcaf893f";

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("support")
        .join(name)
}

pub fn private_key() -> String {
    std::fs::read_to_string(fixture("jwt.pem")).unwrap()
}

pub fn other_private_key() -> String {
    std::fs::read_to_string(fixture("other.pem")).unwrap()
}

pub fn token_with(private_key: &str, claims: Value) -> String {
    sign_token(&claims, private_key, Duration::from_secs(3600)).unwrap()
}

pub fn token(iss: &str, sub: &str) -> String {
    token_with(&private_key(), json!({
        "iss": iss,
        "sub": sub,
        "scopes": ["metadata", "authz", "storage"],
    }))
}

pub fn gate_config(expected_issuer: Option<&str>) -> GateConfig {
    GateConfig {
        key_path: Some(fixture("jwt.pem.pub")),
        expected_issuer: expected_issuer.map(str::to_string),
        ..GateConfig::default()
    }
}

pub fn router(config: GateConfig) -> Router {
    router_for(Arc::new(Gate::new(config)))
}

pub fn router_for(gate: Arc<Gate>) -> Router {
    let limits = HttpLimits {
        body_limit_bytes: 1024 * 1024,
        request_timeout: Duration::from_secs(30),
    };
    app::build_router(AppState::new(gate), limits)
}

pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn description(&self) -> &str {
        self.body["description"].as_str().unwrap_or_default()
    }
}

pub async fn send(router: Router, request: Request<Body>) -> Reply {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply { status, body }
}

pub async fn post(router: Router, path: &str, authorization: Option<&str>) -> Reply {
    let mut request = Request::builder().method("POST").uri(path);
    if let Some(value) = authorization {
        request = request.header("authorization", value);
    }
    send(router, request.body(Body::empty()).unwrap()).await
}
