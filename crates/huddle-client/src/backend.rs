use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use huddle_types::api::{ErrorBody, TokenRequest, TokenResponse, UsersResponse};
use huddle_types::models::ChatUser;

use crate::error::ClientError;

/// The two Huddle API calls a session needs.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn stream_token(&self, user_id: &str) -> Result<String, ClientError>;

    async fn users(&self) -> Result<Vec<ChatUser>, ClientError>;
}

/// [`SessionBackend`] over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SessionBackend for HttpBackend {
    async fn stream_token(&self, user_id: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/stream-token", self.base_url))
            .json(&TokenRequest {
                user_id: Some(user_id.to_string()),
            })
            .send()
            .await?;
        let body: TokenResponse = read_json(resp).await?;
        Ok(body.token)
    }

    async fn users(&self) -> Result<Vec<ChatUser>, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/users", self.base_url))
            .send()
            .await?;
        let body: UsersResponse = read_json(resp).await?;
        Ok(body.users)
    }
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    Err(ClientError::Backend {
        status: status.as_u16(),
        message,
    })
}
