use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::Serialize;

pub fn router(webhook_configured: bool) -> Router<()> {
    Router::new()
        .route("/health", routing::get(health))
        .with_state(webhook_configured)
}

#[derive(Serialize)]
struct HealthResponse {
    http: bool,
    webhook: bool,
}

async fn health(State(webhook): State<bool>) -> Response {
    let status = if webhook {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let response = HealthResponse {
        http: true,
        webhook,
    };

    (status, Json(response)).into_response()
}
