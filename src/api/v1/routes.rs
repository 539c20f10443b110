/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /hello, /hello202 は gate の後ろ (/health は app.rs でルート直下)
 */
use axum::{Router, routing::any};

use crate::api::v1::handlers::hello::{hello, hello_accepted};
use crate::middleware::auth;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let protected: Router<AppState> = Router::new()
        .route("/hello", any(hello))
        .route("/hello202", any(hello_accepted));

    auth::apply(protected, state.gate.clone())
}
