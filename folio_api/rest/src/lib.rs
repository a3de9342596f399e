use std::{net::IpAddr, time::Duration};

use axum::Router;
use folio_core_contact_contracts::ContactService;
use tokio::net::TcpListener;

use crate::routes::contact::ContactRouteConfig;

mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    /// Lifetime of the rate limit cookie.
    pub cookie_ttl: Duration,
    /// Whether a webhook destination is configured; reported by the health
    /// endpoint so operators can spot incomplete deployments.
    pub webhook_configured: bool,
}

impl<Contact: ContactService> RestServer<Contact> {
    pub fn new(contact: Contact, config: RestServerConfig) -> Self {
        Self { contact, config }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port)).await?;
        axum::serve(listener, router).await.map_err(Into::into)
    }

    pub fn router(self) -> Router<()> {
        Router::new()
            .merge(routes::health::router(self.config.webhook_configured))
            .merge(routes::contact::router(
                self.contact.into(),
                ContactRouteConfig {
                    cookie_ttl: self.config.cookie_ttl,
                },
            ))
    }
}
