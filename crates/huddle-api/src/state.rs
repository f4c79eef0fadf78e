use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;

use huddle_webhook::Webhook;

use crate::config::Config;
use crate::providers::{ChatProvider, ClerkDirectory, StreamChat, UserDirectory};

pub type AppState = Arc<AppStateInner>;

/// Provider handles shared by every request. A `None` means the matching
/// credential was not configured.
pub struct AppStateInner {
    pub chat: Option<Arc<dyn ChatProvider>>,
    pub directory: Option<Arc<dyn UserDirectory>>,
    pub webhook: Option<Webhook>,
}

impl AppStateInner {
    /// Construct the real provider clients from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .context("failed to build HTTP client")?;

        let chat = config
            .stream
            .as_ref()
            .map(|creds| {
                StreamChat::new(http.clone(), &config.stream_base_url, creds, config.token_ttl)
                    .map(|c| Arc::new(c) as Arc<dyn ChatProvider>)
            })
            .transpose()
            .context("invalid Stream configuration")?;

        let directory = config
            .clerk_secret_key
            .as_deref()
            .map(|secret| {
                ClerkDirectory::new(http.clone(), &config.clerk_base_url, secret)
                    .map(|d| Arc::new(d) as Arc<dyn UserDirectory>)
            })
            .transpose()
            .context("invalid Clerk configuration")?;

        let webhook = config
            .clerk_webhook_secret
            .as_deref()
            .map(|secret| {
                Webhook::new(secret).map(|w| w.with_tolerance(config.webhook_tolerance_secs))
            })
            .transpose()
            .context("CLERK_WEBHOOK_SECRET is not a valid signing secret")?;

        Ok(Self {
            chat,
            directory,
            webhook,
        })
    }
}
