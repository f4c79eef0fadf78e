use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

pub const DEFAULT_STREAM_BASE_URL: &str = "https://chat.stream-io-api.com";
pub const DEFAULT_CLERK_BASE_URL: &str = "https://api.clerk.com";

/// Upper bound for `HUDDLE_UPSTREAM_TIMEOUT_SECS` (one hour).
pub const MAX_UPSTREAM_TIMEOUT_SECS: u64 = 60 * 60;
/// Upper bound for `HUDDLE_TOKEN_TTL_SECS` (one year).
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Chat provider API key and secret. Only usable as a pair.
#[derive(Clone)]
pub struct StreamCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for StreamCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Process configuration, read once at startup.
///
/// Provider credentials are optional here: a missing credential disables the
/// endpoints that need it (they answer 500) instead of refusing to boot.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub stream: Option<StreamCredentials>,
    pub clerk_secret_key: Option<String>,
    pub clerk_webhook_secret: Option<String>,
    pub stream_base_url: String,
    pub clerk_base_url: String,
    pub upstream_timeout: Duration,
    pub webhook_tolerance_secs: i64,
    /// `None` mints tokens without an expiry.
    pub token_ttl: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let stream = match (var("STREAM_API_KEY"), var("STREAM_API_SECRET")) {
            (Some(api_key), Some(api_secret)) => Some(StreamCredentials { api_key, api_secret }),
            _ => None,
        };

        let port = match var("HUDDLE_PORT") {
            Some(v) => v.parse().with_context(|| format!("HUDDLE_PORT is not a port: {}", v))?,
            None => 3001,
        };

        let upstream_timeout_secs = match var("HUDDLE_UPSTREAM_TIMEOUT_SECS") {
            Some(v) => bounded_secs("HUDDLE_UPSTREAM_TIMEOUT_SECS", &v, MAX_UPSTREAM_TIMEOUT_SECS)?,
            None => 10,
        };

        let webhook_tolerance_secs = match var("HUDDLE_WEBHOOK_TOLERANCE_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("HUDDLE_WEBHOOK_TOLERANCE_SECS is not a number: {}", v))?,
            None => huddle_webhook::DEFAULT_TOLERANCE_SECS,
        };

        let token_ttl = var("HUDDLE_TOKEN_TTL_SECS")
            .map(|v| bounded_secs("HUDDLE_TOKEN_TTL_SECS", &v, MAX_TOKEN_TTL_SECS))
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            host: var("HUDDLE_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            stream,
            clerk_secret_key: var("CLERK_SECRET_KEY"),
            clerk_webhook_secret: var("CLERK_WEBHOOK_SECRET"),
            stream_base_url: var("STREAM_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_STREAM_BASE_URL.into()),
            clerk_base_url: var("CLERK_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CLERK_BASE_URL.into()),
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            webhook_tolerance_secs,
            token_ttl,
        })
    }

    /// Log which integrations are live. Secrets are never logged.
    pub fn log_summary(&self) {
        match &self.stream {
            Some(creds) => info!(api_key = %creds.api_key, "Stream credentials loaded"),
            None => warn!("STREAM_API_KEY/STREAM_API_SECRET missing; token and webhook endpoints will fail"),
        }
        if self.clerk_secret_key.is_none() {
            warn!("CLERK_SECRET_KEY missing; /api/users will fail");
        }
        if self.clerk_webhook_secret.is_none() {
            warn!("CLERK_WEBHOOK_SECRET missing; /api/webhooks/clerk will fail");
        }
        match self.token_ttl {
            Some(ttl) => info!("Chat tokens expire after {}s", ttl.as_secs()),
            None => info!("Chat tokens are issued without expiry"),
        }
    }
}

/// Parse a whole number of seconds in `1..=max`.
fn bounded_secs(key: &str, value: &str, max: u64) -> Result<u64> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("{} is not a number: {}", key, value))?;
    if secs == 0 || secs > max {
        anyhow::bail!("{} must be between 1 and {} seconds, got {}", key, max, secs);
    }
    Ok(secs)
}
