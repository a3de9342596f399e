use std::sync::Arc;

use folio_api_rest::{RestServer, RestServerConfig};
use folio_config::Config;
use folio_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use folio_extern_impl::webhook::{WebhookApiServiceConfig, WebhookApiServiceImpl};
use folio_shared_impl::time::TimeServiceImpl;
use tracing::info;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let webhook_configured = config.webhook.is_some();
    if !webhook_configured {
        info!("No webhook destination configured, submissions cannot be delivered");
    }

    let webhook_api = WebhookApiServiceImpl::new(match config.webhook {
        Some(webhook) => WebhookApiServiceConfig {
            url: Some(Arc::new(webhook.url)),
            username: webhook.username,
            title: webhook.title,
            color: webhook.color,
            footer: webhook.footer,
        },
        None => WebhookApiServiceConfig {
            url: None,
            username: Default::default(),
            title: Default::default(),
            color: 0,
            footer: None,
        },
    });

    let contact = ContactServiceImpl::new(
        TimeServiceImpl,
        webhook_api,
        ContactServiceConfig {
            cooldown: config.contact.cooldown.into(),
        },
    );

    let server = RestServer::new(
        contact,
        RestServerConfig {
            cookie_ttl: config.contact.cookie_ttl.into(),
            webhook_configured,
        },
    );

    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
