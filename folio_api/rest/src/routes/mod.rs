use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::contact::ApiContactResponse;

pub mod contact;
pub mod health;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error.")
}

fn error(code: StatusCode, message: &'static str) -> Response {
    (code, Json(ApiContactResponse::error(message))).into_response()
}
