//! Gate in front of the sample routes, with a good public key on disk.

mod support;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

use support::{ISSUER, SUBJECT, gate_config, post, router, send, token, token_with};

#[tokio::test]
async fn valid_token_passes_through_200() {
    let reply = post(
        router(gate_config(Some(ISSUER))),
        "/api/v1/hello",
        Some(&format!("Bearer {}", token(ISSUER, SUBJECT))),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["client_id"], SUBJECT);
}

#[tokio::test]
async fn valid_token_passes_through_202() {
    let reply = post(
        router(gate_config(Some(ISSUER))),
        "/api/v1/hello202",
        Some(&format!("Bearer {}", token(ISSUER, SUBJECT))),
    )
    .await;

    assert_eq!(reply.status, StatusCode::ACCEPTED);
    assert_eq!(reply.body["client_id"], SUBJECT);
}

#[tokio::test]
async fn subject_forwarded_as_client_id() {
    let reply = post(
        router(gate_config(Some("https://api.example.org/"))),
        "/api/v1/hello",
        Some(&format!("Bearer {}", token("https://api.example.org/", "user-123"))),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["client_id"], "user-123");
}

#[tokio::test]
async fn client_supplied_client_id_is_overwritten() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/hello")
        .header("authorization", format!("Bearer {}", token(ISSUER, "user-123")))
        .header("x-api-client-id", "admin")
        .body(Body::empty())
        .unwrap();

    let reply = send(router(gate_config(None)), request).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["client_id"], "user-123");
}

#[tokio::test]
async fn issuer_check_disabled_when_unconfigured() {
    let reply = post(
        router(gate_config(None)),
        "/api/v1/hello",
        Some(&format!("Bearer {}", token("irakli :)", SUBJECT))),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_jwt_returns_403() {
    let reply = post(router(gate_config(Some(ISSUER))), "/api/v1/hello", Some("Bearer foo")).await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.description(), "ACCESS DENIED: Malformed or invalid Bearer token");
}

#[tokio::test]
async fn token_from_other_key_returns_403() {
    let forged = token_with(
        &support::other_private_key(),
        json!({"iss": ISSUER, "sub": SUBJECT}),
    );
    let reply = post(
        router(gate_config(Some(ISSUER))),
        "/api/v1/hello",
        Some(&format!("Bearer {forged}")),
    )
    .await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.description(), "ACCESS DENIED: Malformed or invalid Bearer token");
}

#[tokio::test]
async fn wrong_issuer_returns_403_invalid_issuer() {
    let reply = post(
        router(gate_config(Some("https://other.example/"))),
        "/api/v1/hello",
        Some(&format!("Bearer {}", token(ISSUER, "user-123"))),
    )
    .await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.description(), "ACCESS DENIED: Invalid Issuer");
}

#[tokio::test]
async fn missing_authorization_header_returns_403() {
    let reply = post(router(gate_config(Some(ISSUER))), "/api/v1/hello", None).await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.description(), "ACCESS DENIED: Authorization header missing.");
}

#[tokio::test]
async fn malformed_bearer_returns_403() {
    for value in ["just foo", "Bearer-token xyz"] {
        let reply = post(router(gate_config(Some(ISSUER))), "/api/v1/hello", Some(value)).await;

        assert_eq!(reply.status, StatusCode::FORBIDDEN);
        assert_eq!(
            reply.description(),
            "ACCESS DENIED: Bearer token missing or invalid in the Authorization header"
        );
    }
}

#[tokio::test]
async fn health_is_not_gated() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let reply = send(router(gate_config(None)), request).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({"status": "ok", "key": "pending"}));
}

#[tokio::test]
async fn health_is_not_under_api_prefix() {
    let request = Request::builder()
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();

    let reply = send(router(gate_config(None)), request).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn token_not_yet_valid_returns_403() {
    let early = token_with(
        &support::private_key(),
        json!({
            "iss": ISSUER,
            "sub": SUBJECT,
            "nbf": chrono::Utc::now().timestamp() + 86_400,
        }),
    );
    let reply = post(
        router(gate_config(Some(ISSUER))),
        "/api/v1/hello",
        Some(&format!("Bearer {early}")),
    )
    .await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.description(), "ACCESS DENIED: Malformed or invalid Bearer token");
}
