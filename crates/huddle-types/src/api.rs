use serde::{Deserialize, Serialize};

use crate::models::ChatUser;

// -- Token --

/// Query string for `GET /api/stream-token`.
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// JSON body for `POST /api/stream-token`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TokenRequest {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// -- Directory --

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<ChatUser>,
}

// -- Webhooks --

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    pub success: bool,
}

// -- Shared --

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
