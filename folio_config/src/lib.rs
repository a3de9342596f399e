use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{File, FileFormat};
use serde::Deserialize;
use url::Url;

mod duration;

pub use duration::Duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Environment variable holding a colon-separated list of config files to
/// load instead of the default path. Later files override earlier ones.
pub const CONFIG_PATH_ENV_VAR: &str = "FOLIO_CONFIG";

pub fn load() -> anyhow::Result<Config> {
    match std::env::var(CONFIG_PATH_ENV_VAR) {
        Ok(paths) => load_paths(&paths.split(':').collect::<Vec<_>>()),
        Err(_) => load_paths(&[DEFAULT_CONFIG_PATH]),
    }
}

pub fn load_paths(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub contact: ContactConfig,
    pub webhook: Option<WebhookConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    /// Minimum interval between accepted submissions per sender.
    pub cooldown: Duration,
    /// Lifetime of the rate limit cookie.
    pub cookie_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct WebhookConfig {
    pub url: Url,
    #[serde(default = "default_webhook_username")]
    pub username: String,
    #[serde(default = "default_webhook_title")]
    pub title: String,
    #[serde(default = "default_webhook_color")]
    pub color: u32,
    pub footer: Option<String>,
}

fn default_webhook_username() -> String {
    "Portfolio Contact".into()
}

fn default_webhook_title() -> String {
    "📩 New portfolio message".into()
}

fn default_webhook_color() -> u32 {
    0xc0a060
}
