use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{EncodingKey, Header, encode};
use reqwest::{Client, Url, header::AUTHORIZATION};
use serde::Serialize;
use tracing::debug;

use huddle_types::models::ChatUser;

use super::{ChatProvider, DeleteUserOptions, ProviderError, endpoint, ensure_success, parse_base_url};
use crate::config::StreamCredentials;

const AUTH_TYPE_HEADER: &str = "stream-auth-type";

/// Claims of a client session token.
#[derive(Debug, Serialize)]
struct UserClaims<'a> {
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Claims of the server-side token used for REST calls.
#[derive(Debug, Serialize)]
struct ServerClaims {
    server: bool,
}

#[derive(Debug, Serialize)]
struct UpsertUsersRequest<'a> {
    users: HashMap<&'a str, &'a ChatUser>,
}

/// Stream Chat server client: local token signing plus the users REST API.
pub struct StreamChat {
    http: Client,
    base_url: Url,
    api_key: String,
    encoding_key: EncodingKey,
    server_token: String,
    token_ttl: Option<Duration>,
}

impl StreamChat {
    pub fn new(
        http: Client,
        base_url: &str,
        credentials: &StreamCredentials,
        token_ttl: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let encoding_key = EncodingKey::from_secret(credentials.api_secret.as_bytes());
        let server_token = encode(&Header::default(), &ServerClaims { server: true }, &encoding_key)?;

        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
            api_key: credentials.api_key.clone(),
            encoding_key,
            server_token,
            token_ttl,
        })
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .query(&[("api_key", self.api_key.as_str())])
            .header(AUTHORIZATION, &self.server_token)
            .header(AUTH_TYPE_HEADER, "jwt")
    }
}

#[async_trait]
impl ChatProvider for StreamChat {
    fn create_token(&self, user_id: &str) -> Result<String, ProviderError> {
        let (iat, exp) = match self.token_ttl {
            Some(ttl) => {
                let now = chrono::Utc::now().timestamp();
                let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
                (Some(now), Some(now.saturating_add(ttl)))
            }
            None => (None, None),
        };

        let claims = UserClaims { user_id, iat, exp };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    async fn upsert_user(&self, user: &ChatUser) -> Result<(), ProviderError> {
        let url = endpoint(&self.base_url, &["users"])?;
        let body = UpsertUsersRequest {
            users: HashMap::from([(user.id.as_str(), user)]),
        };

        let resp = self.authed(self.http.post(url)).json(&body).send().await?;
        ensure_success(resp).await?;

        debug!(user_id = %user.id, "Stream user upserted");
        Ok(())
    }

    async fn delete_user(&self, user_id: &str, options: DeleteUserOptions) -> Result<(), ProviderError> {
        let url = endpoint(&self.base_url, &["users", user_id])?;

        let resp = self
            .authed(self.http.delete(url))
            .query(&[
                ("hard_delete", options.hard_delete),
                ("mark_messages_deleted", options.mark_messages_deleted),
            ])
            .send()
            .await?;
        ensure_success(resp).await?;

        debug!(user_id = %user_id, ?options, "Stream user deleted");
        Ok(())
    }
}
