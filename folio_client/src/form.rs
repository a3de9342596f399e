use std::{collections::BTreeMap, time::Duration};

use folio_models::contact::ContactSubmissionDraft;
use folio_shared_contracts::time::TimeService;

use crate::{
    api::{ContactApi, ContactApiError, ContactApiResponse},
    store::LastSentStore,
};

#[derive(Debug, Clone)]
pub struct ContactFormConfig {
    /// Must match the server's `contact.cooldown` so the local countdown
    /// stays aligned with the authoritative cookie.
    pub cooldown: Duration,
}

impl Default for ContactFormConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Sending,
    Sent,
}

/// State machine for one contact form instance.
///
/// The embedding UI owns the 1 Hz timer and calls [`ContactForm::tick`]
/// once per second while a cooldown is active; everything else is driven by
/// field edits and [`ContactForm::submit`].
pub struct ContactForm<Api, Store, Time> {
    api: Api,
    store: Store,
    time: Time,
    config: ContactFormConfig,
    pub fields: FormFields,
    phase: FormPhase,
    error: Option<String>,
    field_errors: BTreeMap<String, String>,
    cooldown_left: u64,
}

impl<Api, Store, Time> ContactForm<Api, Store, Time>
where
    Api: ContactApi,
    Store: LastSentStore,
    Time: TimeService,
{
    pub fn new(api: Api, store: Store, time: Time, config: ContactFormConfig) -> Self {
        let last = store.load().unwrap_or(0);
        let now = time.now().timestamp_millis();
        let cooldown_ms = config.cooldown.as_millis() as i64;
        let cooldown_left = ((last + cooldown_ms - now).max(0) / 1000) as u64;

        Self {
            api,
            store,
            time,
            config,
            fields: FormFields::default(),
            phase: FormPhase::Idle,
            error: None,
            field_errors: BTreeMap::new(),
            cooldown_left,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    pub fn cooldown_left(&self) -> u64 {
        self.cooldown_left
    }

    /// Advances the countdown by one second. Stops at zero; the caller can
    /// drop its timer once this returns zero.
    pub fn tick(&mut self) -> u64 {
        self.cooldown_left = self.cooldown_left.saturating_sub(1);
        self.cooldown_left
    }

    /// Remaining cooldown as `M:SS`, or the empty string when inactive.
    pub fn cooldown_label(&self) -> String {
        if self.cooldown_left == 0 {
            return String::new();
        }
        format!("{}:{:02}", self.cooldown_left / 60, self.cooldown_left % 60)
    }

    /// Label for the submit control in its current state.
    pub fn submit_label(&self) -> String {
        if self.phase == FormPhase::Sending {
            "Sending...".into()
        } else if self.cooldown_left > 0 {
            format!("Please wait {}", self.cooldown_label())
        } else {
            "Send Message".into()
        }
    }

    pub fn can_submit(&self) -> bool {
        self.phase != FormPhase::Sending && self.cooldown_left == 0
    }

    /// Runs one submission attempt through the full lifecycle.
    pub async fn submit(&mut self) {
        self.error = None;
        self.field_errors.clear();
        if self.phase == FormPhase::Sent {
            self.phase = FormPhase::Idle;
        }

        if self.cooldown_left > 0 {
            self.error = Some(format!(
                "Please wait {} before sending another message.",
                self.cooldown_label()
            ));
            return;
        }

        let name = self.fields.name.trim();
        let email = self.fields.email.trim();
        let message = self.fields.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            self.error = Some("Please fill out all fields.".into());
            return;
        }

        let draft = ContactSubmissionDraft {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            company: String::new(),
        };

        self.phase = FormPhase::Sending;
        let result = self.api.submit(&draft).await;
        self.phase = FormPhase::Idle;

        match result {
            Ok(response) => self.apply_response(response),
            Err(ContactApiError::Network(_)) => {
                self.error =
                    Some("Network error. Please check your connection and try again.".into());
            }
        }
    }

    fn apply_response(&mut self, response: ContactApiResponse) {
        let body = response.body;

        if response.status == 429 {
            let retry_after = response
                .retry_after
                .or_else(|| body.as_ref().and_then(|body| body.retry_after))
                .unwrap_or(0);

            self.error = Some(
                body.and_then(|body| body.error).unwrap_or_else(|| {
                    "You've sent a message recently. Please wait before trying again.".into()
                }),
            );

            if retry_after > 0 {
                self.cooldown_left = retry_after;
                // Recompute the persisted timestamp from the server's
                // retry-after so a drifted or cleared local value converges
                // back to the authoritative cooldown.
                let now = self.time.now().timestamp_millis();
                let cooldown_secs = self.config.cooldown.as_secs() as i64;
                self.store
                    .store(now - (cooldown_secs - retry_after as i64) * 1000);
            }
            return;
        }

        if response.status == 400 {
            if let Some(body) = body
                .as_ref()
                .filter(|body| !body.issues.is_empty())
            {
                for issue in &body.issues {
                    self.field_errors
                        .insert(issue.path.clone(), issue.message.clone());
                }
                self.error = Some(
                    body.error
                        .clone()
                        .unwrap_or_else(|| "Please correct the highlighted fields.".into()),
                );
                return;
            }
        }

        if !(200..300).contains(&response.status) {
            self.error = Some(body.and_then(|body| body.error).unwrap_or_else(|| {
                format!(
                    "Server error ({}). Please try again.",
                    response.status
                )
            }));
            return;
        }

        if body.as_ref().is_some_and(|body| body.ok) {
            self.phase = FormPhase::Sent;
            self.fields = FormFields::default();
            let now = self.time.now().timestamp_millis();
            self.store.store(now);
            self.cooldown_left = self.config.cooldown.as_secs();
        } else {
            self.error = Some(
                body.and_then(|body| body.error)
                    .unwrap_or_else(|| "Something went wrong.".into()),
            );
        }
    }
}
