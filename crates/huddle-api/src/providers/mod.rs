pub mod clerk;
pub mod stream;

use async_trait::async_trait;
use reqwest::Url;

use huddle_types::models::{ChatUser, IdentityUser};

pub use clerk::ClerkDirectory;
pub use stream::StreamChat;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("invalid upstream url: {0}")]
    Url(String),
}

/// How a chat user deletion treats the user's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteUserOptions {
    pub hard_delete: bool,
    pub mark_messages_deleted: bool,
}

impl DeleteUserOptions {
    /// Remove the user and everything they wrote.
    pub const PURGE: Self = Self {
        hard_delete: true,
        mark_messages_deleted: true,
    };
}

/// The chat backend: session tokens plus the user mirror.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Mint a client session token for `user_id`. Signing is local.
    fn create_token(&self, user_id: &str) -> Result<String, ProviderError>;

    /// Create or update a user, keyed by `user.id`.
    async fn upsert_user(&self, user: &ChatUser) -> Result<(), ProviderError>;

    async fn delete_user(&self, user_id: &str, options: DeleteUserOptions) -> Result<(), ProviderError>;
}

/// Read-only access to the identity provider's user list.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self) -> Result<Vec<IdentityUser>, ProviderError>;
}

pub(crate) fn parse_base_url(base: &str) -> Result<Url, ProviderError> {
    let url = Url::parse(base).map_err(|e| ProviderError::Url(format!("{}: {}", base, e)))?;
    if url.cannot_be_a_base() {
        return Err(ProviderError::Url(base.to_string()));
    }
    Ok(url)
}

/// Append percent-encoded path segments to `base`.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ProviderError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ProviderError::Url(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Pass 2xx responses through; turn anything else into [`ProviderError::Status`].
pub(crate) async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        body,
    })
}
