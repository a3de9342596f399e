use std::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait WebhookApiService: Send + Sync + 'static {
    /// Delivers a contact notification to the configured webhook.
    fn deliver(
        &self,
        notification: WebhookNotification,
    ) -> impl Future<Output = Result<(), WebhookDeliverError>> + Send;
}

/// The content of one outbound notification. Field values are clipped to the
/// webhook's display limits by the implementation, not by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookNotification {
    pub author_name: String,
    pub author_email: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum WebhookDeliverError {
    #[error("No webhook url is configured.")]
    NotConfigured,
    #[error("Webhook returned status {0}.")]
    UpstreamStatus(u16),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockWebhookApiService {
    pub fn with_deliver(
        mut self,
        notification: WebhookNotification,
        result: Result<(), WebhookDeliverError>,
    ) -> Self {
        self.expect_deliver()
            .once()
            .with(mockall::predicate::eq(notification))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
