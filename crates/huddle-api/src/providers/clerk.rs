use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use huddle_types::models::IdentityUser;

use super::{ProviderError, UserDirectory, endpoint, ensure_success, parse_base_url};

/// Clerk backend API, used only to list users.
pub struct ClerkDirectory {
    http: Client,
    base_url: Url,
    secret_key: String,
}

impl ClerkDirectory {
    pub fn new(http: Client, base_url: &str, secret_key: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
            secret_key: secret_key.to_string(),
        })
    }
}

#[async_trait]
impl UserDirectory for ClerkDirectory {
    async fn list_users(&self) -> Result<Vec<IdentityUser>, ProviderError> {
        let url = endpoint(&self.base_url, &["v1", "users"])?;

        let resp = self.http.get(url).bearer_auth(&self.secret_key).send().await?;
        let users: Vec<IdentityUser> = ensure_success(resp).await?.json().await?;

        debug!(count = users.len(), "Fetched users from Clerk");
        Ok(users)
    }
}
