use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use folio_core_contact_contracts::{
    ContactService, ContactSubmitCommand, ContactSubmitError,
};
use folio_models::contact::ContactSubmissionDraft;

use super::{error, internal_server_error};
use crate::models::contact::{ApiContactResponse, ApiFieldIssue};

pub const RATE_LIMIT_COOKIE: &str = "contact_last";

#[derive(Debug, Clone)]
pub struct ContactRouteConfig {
    pub cookie_ttl: Duration,
}

struct ContactState<Service> {
    service: Arc<Service>,
    cookie_ttl: Duration,
}

impl<Service> Clone for ContactState<Service> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            cookie_ttl: self.cookie_ttl,
        }
    }
}

pub fn router(service: Arc<impl ContactService>, config: ContactRouteConfig) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(submit))
        .with_state(ContactState {
            service,
            cookie_ttl: config.cookie_ttl,
        })
}

async fn submit(
    State(state): State<ContactState<impl ContactService>>,
    jar: CookieJar,
    body: Option<Json<ContactSubmissionDraft>>,
) -> Response {
    // A malformed or missing body falls back to an empty draft, which then
    // fails validation with one issue per required field.
    let draft = body.map(|Json(draft)| draft).unwrap_or_default();
    let last_sent = jar
        .get(RATE_LIMIT_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
        .and_then(DateTime::from_timestamp_millis);

    match state.service.submit(ContactSubmitCommand { draft, last_sent }).await {
        Ok(outcome) => {
            let cookie = rate_limit_cookie(outcome.sent_at(), state.cookie_ttl);
            (jar.add(cookie), Json(ApiContactResponse::ok())).into_response()
        }
        Err(ContactSubmitError::RateLimited { retry_after_secs }) => {
            rate_limited(retry_after_secs)
        }
        Err(ContactSubmitError::Validation(errors)) => {
            let issues = errors.iter().map(ApiFieldIssue::from).collect();
            let response = ApiContactResponse {
                issues: Some(issues),
                ..ApiContactResponse::error("Invalid form data.")
            };
            (StatusCode::BAD_REQUEST, Json(response)).into_response()
        }
        Err(ContactSubmitError::NotConfigured) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, "Webhook not configured.")
        }
        Err(ContactSubmitError::Deliver) => {
            error(StatusCode::BAD_GATEWAY, "Failed to deliver message.")
        }
        Err(ContactSubmitError::Other(err)) => internal_server_error(err),
    }
}

fn rate_limited(retry_after_secs: u64) -> Response {
    let minutes = retry_after_secs.div_ceil(60);
    let plural = if minutes == 1 { "" } else { "s" };
    let response = ApiContactResponse {
        retry_after: Some(retry_after_secs),
        ..ApiContactResponse::error(format!(
            "You’ve already sent a message recently. Please wait about {minutes} \
             minute{plural} before trying again."
        ))
    };
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, retry_after_secs.to_string())],
        Json(response),
    )
        .into_response()
}

fn rate_limit_cookie(sent_at: DateTime<Utc>, ttl: Duration) -> Cookie<'static> {
    Cookie::build((RATE_LIMIT_COOKIE, sent_at.timestamp_millis().to_string()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(ttl.as_secs() as i64))
        .build()
}
