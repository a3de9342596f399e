use std::{sync::LazyLock, time::Duration};

use folio_core_contact_contracts::{
    ContactService, ContactSubmitCommand, ContactSubmitError, ContactSubmitOk,
};
use folio_extern_contracts::webhook::{
    WebhookApiService, WebhookDeliverError, WebhookNotification,
};
use folio_shared_contracts::time::TimeService;
use regex::Regex;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Time, WebhookApi> {
    time: Time,
    webhook_api: WebhookApi,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    /// Minimum interval between accepted submissions from the same sender.
    pub cooldown: Duration,
}

impl<Time, WebhookApi> ContactServiceImpl<Time, WebhookApi> {
    pub fn new(time: Time, webhook_api: WebhookApi, config: ContactServiceConfig) -> Self {
        Self {
            time,
            webhook_api,
            config,
        }
    }
}

impl<Time, WebhookApi> ContactService for ContactServiceImpl<Time, WebhookApi>
where
    Time: TimeService,
    WebhookApi: WebhookApiService,
{
    async fn submit(
        &self,
        cmd: ContactSubmitCommand,
    ) -> Result<ContactSubmitOk, ContactSubmitError> {
        let now = self.time.now();

        if let Some(last_sent) = cmd.last_sent {
            let cooldown = chrono::Duration::from_std(self.config.cooldown)
                .map_err(anyhow::Error::from)?;
            let elapsed = now.signed_duration_since(last_sent);
            if elapsed < cooldown {
                let remaining = cooldown - elapsed;
                let retry_after_secs =
                    (remaining.num_milliseconds().max(0) as u64).div_ceil(1000);
                return Err(ContactSubmitError::RateLimited { retry_after_secs });
            }
        }

        let submission = cmd
            .draft
            .validate()
            .map_err(ContactSubmitError::Validation)?;

        // Both drop paths are reported as a success so that automated
        // senders cannot tell their message was filtered. The caller still
        // renews the cooldown for them.
        if !submission.company.trim().is_empty() {
            debug!("discarding submission with filled honeypot field");
            return Ok(ContactSubmitOk::Discarded { sent_at: now });
        }

        if is_spammy(&format!("{} {}", *submission.name, *submission.message)) {
            debug!("discarding submission matching spam pattern");
            return Ok(ContactSubmitOk::Discarded { sent_at: now });
        }

        self.webhook_api
            .deliver(WebhookNotification {
                author_name: submission.name.into_inner(),
                author_email: submission.email.to_string(),
                message: submission.message.into_inner(),
                sent_at: now,
            })
            .await
            .map_err(|err| match err {
                WebhookDeliverError::NotConfigured => ContactSubmitError::NotConfigured,
                WebhookDeliverError::UpstreamStatus(status) => {
                    tracing::error!("webhook delivery failed with status {status}");
                    ContactSubmitError::Deliver
                }
                WebhookDeliverError::Other(err) => err.into(),
            })?;

        Ok(ContactSubmitOk::Delivered { sent_at: now })
    }
}

static SPAM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(viagra|casino|loan|crypto|http://|https://)\b").unwrap()
});

/// Heuristic keyword/URL filter over the combined name and message text.
/// Deliberately minimal and easily bypassed; it is a nuisance filter, not a
/// security boundary.
fn is_spammy(text: &str) -> bool {
    SPAM_PATTERN.is_match(text)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};
    use folio_extern_contracts::webhook::MockWebhookApiService;
    use folio_models::contact::{ContactFieldError, ContactSubmissionDraft};
    use folio_shared_contracts::time::MockTimeService;

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn config() -> ContactServiceConfig {
        ContactServiceConfig {
            cooldown: Duration::from_secs(300),
        }
    }

    fn draft() -> ContactSubmissionDraft {
        ContactSubmissionDraft {
            name: "Al".into(),
            email: "a@b.com".into(),
            message: "1234567890".into(),
            company: String::new(),
        }
    }

    fn notification() -> WebhookNotification {
        WebhookNotification {
            author_name: "Al".into(),
            author_email: "a@b.com".into(),
            message: "1234567890".into(),
            sent_at: now(),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let webhook_api = MockWebhookApiService::new().with_deliver(notification(), Ok(()));
        let sut = ContactServiceImpl::new(time, webhook_api, config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: draft(),
                last_sent: None,
            })
            .await;

        // Assert
        assert_eq!(result.unwrap(), ContactSubmitOk::Delivered { sent_at: now() });
    }

    #[tokio::test]
    async fn ok_after_cooldown_expired() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let webhook_api = MockWebhookApiService::new().with_deliver(notification(), Ok(()));
        let sut = ContactServiceImpl::new(time, webhook_api, config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: draft(),
                last_sent: Some(now() - TimeDelta::seconds(301)),
            })
            .await;

        // Assert
        assert_eq!(result.unwrap(), ContactSubmitOk::Delivered { sent_at: now() });
    }

    #[tokio::test]
    async fn rate_limited() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let sut = ContactServiceImpl::new(time, MockWebhookApiService::new(), config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: draft(),
                last_sent: Some(now() - TimeDelta::seconds(60)),
            })
            .await;

        // Assert
        assert!(matches!(
            result,
            Err(ContactSubmitError::RateLimited {
                retry_after_secs: 240
            })
        ));
    }

    #[tokio::test]
    async fn rate_limited_immediate_repeat() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let sut = ContactServiceImpl::new(time, MockWebhookApiService::new(), config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: draft(),
                last_sent: Some(now()),
            })
            .await;

        // Assert
        assert!(matches!(
            result,
            Err(ContactSubmitError::RateLimited {
                retry_after_secs: 300
            })
        ));
    }

    #[tokio::test]
    async fn rate_limited_rounds_partial_seconds_up() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let sut = ContactServiceImpl::new(time, MockWebhookApiService::new(), config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: draft(),
                last_sent: Some(now() - TimeDelta::milliseconds(500)),
            })
            .await;

        // Assert
        assert!(matches!(
            result,
            Err(ContactSubmitError::RateLimited {
                retry_after_secs: 300
            })
        ));
    }

    #[tokio::test]
    async fn rate_limit_is_checked_before_validation() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let sut = ContactServiceImpl::new(time, MockWebhookApiService::new(), config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: ContactSubmissionDraft::default(),
                last_sent: Some(now()),
            })
            .await;

        // Assert
        assert!(matches!(result, Err(ContactSubmitError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn validation_error() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let sut = ContactServiceImpl::new(time, MockWebhookApiService::new(), config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: ContactSubmissionDraft {
                    message: "short".into(),
                    ..draft()
                },
                last_sent: None,
            })
            .await;

        // Assert
        let Err(ContactSubmitError::Validation(errors)) = result else {
            panic!("expected a validation error");
        };
        assert_eq!(errors, [ContactFieldError::MessageTooShort]);
    }

    #[tokio::test]
    async fn honeypot_discards_silently() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let sut = ContactServiceImpl::new(time, MockWebhookApiService::new(), config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: ContactSubmissionDraft {
                    company: "spammer-co".into(),
                    ..draft()
                },
                last_sent: None,
            })
            .await;

        // Assert
        assert_eq!(result.unwrap(), ContactSubmitOk::Discarded { sent_at: now() });
    }

    #[tokio::test]
    async fn honeypot_ignores_whitespace() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let webhook_api = MockWebhookApiService::new().with_deliver(notification(), Ok(()));
        let sut = ContactServiceImpl::new(time, webhook_api, config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: ContactSubmissionDraft {
                    company: "   ".into(),
                    ..draft()
                },
                last_sent: None,
            })
            .await;

        // Assert
        assert_eq!(result.unwrap(), ContactSubmitOk::Delivered { sent_at: now() });
    }

    #[tokio::test]
    async fn spam_keyword_discards_silently() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let sut = ContactServiceImpl::new(time, MockWebhookApiService::new(), config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: ContactSubmissionDraft {
                    message: "buy cheap viagra today".into(),
                    ..draft()
                },
                last_sent: None,
            })
            .await;

        // Assert
        assert_eq!(result.unwrap(), ContactSubmitOk::Discarded { sent_at: now() });
    }

    #[tokio::test]
    async fn spam_url_discards_silently() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let sut = ContactServiceImpl::new(time, MockWebhookApiService::new(), config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: ContactSubmissionDraft {
                    message: "check out https://spam.example".into(),
                    ..draft()
                },
                last_sent: None,
            })
            .await;

        // Assert
        assert_eq!(result.unwrap(), ContactSubmitOk::Discarded { sent_at: now() });
    }

    #[tokio::test]
    async fn not_configured() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let webhook_api = MockWebhookApiService::new()
            .with_deliver(notification(), Err(WebhookDeliverError::NotConfigured));
        let sut = ContactServiceImpl::new(time, webhook_api, config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: draft(),
                last_sent: None,
            })
            .await;

        // Assert
        assert!(matches!(result, Err(ContactSubmitError::NotConfigured)));
    }

    #[tokio::test]
    async fn deliver_failed() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let webhook_api = MockWebhookApiService::new()
            .with_deliver(notification(), Err(WebhookDeliverError::UpstreamStatus(500)));
        let sut = ContactServiceImpl::new(time, webhook_api, config());

        // Act
        let result = sut
            .submit(ContactSubmitCommand {
                draft: draft(),
                last_sent: None,
            })
            .await;

        // Assert
        assert!(matches!(result, Err(ContactSubmitError::Deliver)));
    }

    #[test]
    fn spam_pattern() {
        for spammy in [
            "win at the casino",
            "CRYPTO gains",
            "cheap loan offers",
            "ViAgRa",
            "see http://example.com",
            "see https://example.com",
        ] {
            assert!(is_spammy(spammy), "{spammy:?} should match");
        }

        for legit in [
            "hello, I would like a website",
            "cryptic but harmless",
            "galoans are a fictional species",
            "https:// with nothing after it",
        ] {
            assert!(!is_spammy(legit), "{legit:?} should not match");
        }
    }
}
