use async_trait::async_trait;

use huddle_types::channels::{
    EVERYONE_CHANNEL_ID, EVERYONE_CHANNEL_NAME, MESSAGING_CHANNEL_TYPE, direct_channel_id,
};
use huddle_types::models::ChatUser;

use crate::error::ClientError;

/// Everything needed to watch (and, if absent, create) a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub channel_type: String,
    pub id: String,
    pub name: Option<String>,
    /// Empty for open channels.
    pub members: Vec<String>,
}

impl ChannelSpec {
    pub fn everyone() -> Self {
        Self {
            channel_type: MESSAGING_CHANNEL_TYPE.to_string(),
            id: EVERYONE_CHANNEL_ID.to_string(),
            name: Some(EVERYONE_CHANNEL_NAME.to_string()),
            members: Vec::new(),
        }
    }

    /// 1-on-1 channel between `me` and `other`, named after `other`.
    pub fn direct(me: &str, other: &ChatUser) -> Self {
        Self {
            channel_type: MESSAGING_CHANNEL_TYPE.to_string(),
            id: direct_channel_id(me, &other.id),
            name: Some(other.name.clone()),
            members: vec![me.to_string(), other.id.clone()],
        }
    }
}

/// The chat provider's client connection, owned by the embedding app.
#[async_trait]
pub trait ChatConnection: Send + Sync {
    async fn connect(&self, user: &ChatUser, token: &str) -> Result<(), ClientError>;

    /// Watch `channel`, creating it when it does not exist yet.
    async fn watch(&self, channel: &ChannelSpec) -> Result<(), ClientError>;

    async fn disconnect(&self) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str) -> ChatUser {
        ChatUser {
            id: id.into(),
            name: name.into(),
            image: None,
        }
    }

    #[test]
    fn everyone_channel() {
        let spec = ChannelSpec::everyone();
        assert_eq!(spec.channel_type, "messaging");
        assert_eq!(spec.id, "everyone");
        assert_eq!(spec.name.as_deref(), Some("Everyone Chat"));
        assert!(spec.members.is_empty());
    }

    #[test]
    fn direct_channel_matches_from_both_sides() {
        let alice = user("user_a", "Alice");
        let bob = user("user_b", "Bob");

        let from_alice = ChannelSpec::direct(&alice.id, &bob);
        let from_bob = ChannelSpec::direct(&bob.id, &alice);

        assert_eq!(from_alice.id, "user_a-user_b");
        assert_eq!(from_alice.id, from_bob.id);
        assert_eq!(from_alice.name.as_deref(), Some("Bob"));
        assert_eq!(from_bob.name.as_deref(), Some("Alice"));
        assert_eq!(from_alice.members, vec!["user_a", "user_b"]);
    }
}
