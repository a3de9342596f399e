use std::future::Future;

use chrono::{DateTime, Utc};
use folio_models::contact::{ContactFieldError, ContactSubmissionDraft};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Runs one submission through the contact pipeline: rate limit check,
    /// schema validation, honeypot and spam filtering, webhook relay.
    fn submit(
        &self,
        cmd: ContactSubmitCommand,
    ) -> impl Future<Output = Result<ContactSubmitOk, ContactSubmitError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmitCommand {
    pub draft: ContactSubmissionDraft,
    /// Timestamp from the sender's rate limit cookie, if present.
    pub last_sent: Option<DateTime<Utc>>,
}

/// Successful outcomes. `Discarded` covers submissions dropped by the
/// honeypot or spam filter; callers must present it exactly like
/// `Delivered` so that senders cannot probe the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSubmitOk {
    Delivered { sent_at: DateTime<Utc> },
    Discarded { sent_at: DateTime<Utc> },
}

impl ContactSubmitOk {
    /// The timestamp to persist as the sender's new cooldown anchor.
    pub fn sent_at(self) -> DateTime<Utc> {
        match self {
            Self::Delivered { sent_at } | Self::Discarded { sent_at } => sent_at,
        }
    }
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("Cooldown active for another {retry_after_secs} seconds.")]
    RateLimited { retry_after_secs: u64 },
    #[error("Submission failed validation.")]
    Validation(Vec<ContactFieldError>),
    #[error("No webhook destination is configured.")]
    NotConfigured,
    #[error("Failed to deliver the message to the webhook.")]
    Deliver,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_submit(
        mut self,
        cmd: ContactSubmitCommand,
        result: Result<ContactSubmitOk, ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(cmd))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
