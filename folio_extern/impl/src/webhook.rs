use std::sync::Arc;

use chrono::SecondsFormat;
use folio_extern_contracts::webhook::{
    WebhookApiService, WebhookDeliverError, WebhookNotification,
};
use serde::Serialize;
use url::Url;

use crate::http::HttpClient;

/// Display limits of the upstream embed format.
pub const AUTHOR_CLIP: usize = 256;
pub const MESSAGE_CLIP: usize = 1900;

#[derive(Debug, Clone)]
pub struct WebhookApiServiceImpl {
    config: WebhookApiServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct WebhookApiServiceConfig {
    pub url: Option<Arc<Url>>,
    pub username: String,
    pub title: String,
    pub color: u32,
    pub footer: Option<String>,
}

impl WebhookApiServiceImpl {
    pub fn new(config: WebhookApiServiceConfig) -> Self {
        Self {
            config,
            client: HttpClient::default(),
        }
    }
}

impl WebhookApiService for WebhookApiServiceImpl {
    async fn deliver(&self, notification: WebhookNotification) -> Result<(), WebhookDeliverError> {
        let Some(url) = self.config.url.as_deref() else {
            return Err(WebhookDeliverError::NotConfigured);
        };

        let request = WebhookRequest::new(&self.config, &notification);
        let response = self
            .client
            .post(url.clone())
            .json(&request)
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookDeliverError::UpstreamStatus(status.as_u16()));
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct WebhookRequest {
    username: String,
    embeds: Vec<Embed>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct Embed {
    title: String,
    color: u32,
    timestamp: String,
    fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<EmbedFooter>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct EmbedField {
    name: &'static str,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline: Option<bool>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct EmbedFooter {
    text: String,
}

impl WebhookRequest {
    fn new(config: &WebhookApiServiceConfig, notification: &WebhookNotification) -> Self {
        Self {
            username: config.username.clone(),
            embeds: vec![Embed {
                title: config.title.clone(),
                color: config.color,
                timestamp: notification
                    .sent_at
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
                fields: vec![
                    EmbedField {
                        name: "From",
                        value: clip(&notification.author_name, AUTHOR_CLIP),
                        inline: Some(true),
                    },
                    EmbedField {
                        name: "Email",
                        value: clip(&notification.author_email, AUTHOR_CLIP),
                        inline: Some(true),
                    },
                    EmbedField {
                        name: "Message",
                        value: clip(&notification.message, MESSAGE_CLIP),
                        inline: None,
                    },
                ],
                footer: config
                    .footer
                    .clone()
                    .map(|text| EmbedFooter { text }),
            }],
        }
    }
}

/// Clips `s` to at most `max` characters, replacing the tail with an
/// ellipsis when the value does not fit.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let mut out = s.chars().take(max - 1).collect::<String>();
        out.push('…');
        out
    } else {
        s.to_owned()
    }
}
