use serde::{Deserialize, Serialize};

/// Display name used when an identity record carries neither a full name nor
/// an email address.
pub const UNKNOWN_USER_NAME: &str = "Unknown User";

// -- Identity provider records --

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    #[serde(default)]
    pub email_address: Option<String>,
}

/// A user record as the identity provider reports it, both from the
/// management API and inside lifecycle webhooks. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email_addresses: Option<Vec<EmailAddress>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

impl IdentityUser {
    /// Full name if both parts are present, else the first email address,
    /// else [`UNKNOWN_USER_NAME`].
    pub fn display_name(&self) -> String {
        match (non_empty(&self.first_name), non_empty(&self.last_name)) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            _ => self
                .primary_email()
                .map(str::to_string)
                .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string()),
        }
    }

    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .as_ref()?
            .first()
            .and_then(|e| non_empty(&e.email_address))
    }

    /// Avatar URL: `image_url`, falling back to the legacy `profile_image_url`.
    pub fn avatar(&self) -> Option<String> {
        non_empty(&self.image_url)
            .or_else(|| non_empty(&self.profile_image_url))
            .map(str::to_string)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// -- Chat provider mirror --

/// The `{id, name, image}` shape mirrored into the chat provider and served
/// by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&IdentityUser> for ChatUser {
    fn from(user: &IdentityUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.display_name(),
            image: user.avatar(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> IdentityUser {
        IdentityUser {
            id: "user_1".into(),
            first_name: first.map(Into::into),
            last_name: last.map(Into::into),
            email_addresses: email.map(|e| {
                vec![EmailAddress {
                    email_address: Some(e.into()),
                }]
            }),
            ..Default::default()
        }
    }

    #[test]
    fn full_name_wins_when_both_parts_present() {
        let u = user(Some("Ada"), Some("Lovelace"), Some("ada@example.com"));
        assert_eq!(u.display_name(), "Ada Lovelace");
    }

    #[test]
    fn falls_back_to_first_email() {
        let u = user(Some("Ada"), None, Some("ada@example.com"));
        assert_eq!(u.display_name(), "ada@example.com");

        let u = user(Some("Ada"), Some(""), Some("ada@example.com"));
        assert_eq!(u.display_name(), "ada@example.com");
    }

    #[test]
    fn unknown_user_when_nothing_usable() {
        assert_eq!(user(None, None, None).display_name(), UNKNOWN_USER_NAME);
        assert_eq!(user(None, Some("Lovelace"), Some("")).display_name(), UNKNOWN_USER_NAME);
    }

    #[test]
    fn avatar_prefers_image_url() {
        let mut u = user(None, None, None);
        assert_eq!(u.avatar(), None);

        u.profile_image_url = Some("https://img/legacy.png".into());
        assert_eq!(u.avatar().as_deref(), Some("https://img/legacy.png"));

        u.image_url = Some("https://img/new.png".into());
        assert_eq!(u.avatar().as_deref(), Some("https://img/new.png"));
    }

    #[test]
    fn chat_user_omits_missing_image() {
        let chat = ChatUser::from(&user(Some("Ada"), Some("Lovelace"), None));
        let json = serde_json::to_value(&chat).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "user_1", "name": "Ada Lovelace" }));
    }

    #[test]
    fn tolerates_null_and_unknown_fields() {
        let raw = r#"{
            "id": "user_2",
            "object": "user",
            "first_name": null,
            "last_name": null,
            "email_addresses": null,
            "image_url": "https://img/a.png",
            "created_at": 1700000000000
        }"#;
        let u: IdentityUser = serde_json::from_str(raw).unwrap();
        let chat = ChatUser::from(&u);
        assert_eq!(chat.name, UNKNOWN_USER_NAME);
        assert_eq!(chat.image.as_deref(), Some("https://img/a.png"));
    }
}
