use serde::Deserialize;

use crate::models::IdentityUser;

pub const USER_CREATED: &str = "user.created";
pub const USER_UPDATED: &str = "user.updated";
pub const USER_DELETED: &str = "user.deleted";

/// Outer shape of every identity provider webhook: `{ "type", "data", ... }`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct DeletedUser {
    id: String,
}

/// Lifecycle events the chat sync cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// `user.created` or `user.updated`
    UserUpserted(IdentityUser),
    UserDeleted { id: String },
    /// Any other event type, carried for logging only.
    Other(String),
}

impl IdentityEvent {
    /// Parse a (verified) webhook body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        match envelope.event_type.as_str() {
            USER_CREATED | USER_UPDATED => {
                Ok(Self::UserUpserted(serde_json::from_value(envelope.data)?))
            }
            USER_DELETED => {
                let deleted: DeletedUser = serde_json::from_value(envelope.data)?;
                Ok(Self::UserDeleted { id: deleted.id })
            }
            _ => Ok(Self::Other(envelope.event_type)),
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::UserUpserted(_) => "user.upserted",
            Self::UserDeleted { .. } => USER_DELETED,
            Self::Other(t) => t,
        }
    }
}
