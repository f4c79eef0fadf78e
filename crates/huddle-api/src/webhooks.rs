use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use tracing::{debug, info};

use huddle_types::api::WebhookAck;
use huddle_types::events::IdentityEvent;
use huddle_types::models::ChatUser;
use huddle_webhook::{ID_HEADER, SIGNATURE_HEADER, SignatureHeaders, TIMESTAMP_HEADER};

use crate::error::ApiError;
use crate::providers::{ChatProvider, DeleteUserOptions, ProviderError};
use crate::state::AppState;

/// POST /api/webhooks/clerk: mirror identity lifecycle events into chat.
///
/// The body is taken as raw bytes so the signature is checked against
/// exactly what was sent.
pub async fn clerk_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let webhook = state.webhook.as_ref().ok_or(ApiError::WebhookNotConfigured)?;
    let chat = state.chat.as_ref().ok_or(ApiError::ChatNotConfigured)?;

    let signature = signature_headers(&headers).ok_or(ApiError::MissingSignatureHeaders)?;
    webhook
        .verify(&signature, &body)
        .map_err(ApiError::Verification)?;

    let event = IdentityEvent::from_slice(&body).map_err(ApiError::InvalidPayload)?;
    debug!(svix_id = signature.id, event = event.kind(), "Verified webhook");

    apply_event(chat.as_ref(), event)
        .await
        .map_err(ApiError::WebhookProcessing)?;

    Ok(Json(WebhookAck { success: true }))
}

/// All three signature headers, or `None` if any is missing or empty.
fn signature_headers(headers: &HeaderMap) -> Option<SignatureHeaders<'_>> {
    Some(SignatureHeaders {
        id: header(headers, ID_HEADER)?,
        timestamp: header(headers, TIMESTAMP_HEADER)?,
        signature: header(headers, SIGNATURE_HEADER)?,
    })
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Apply one verified event to the chat provider. At most one provider call.
pub async fn apply_event(chat: &dyn ChatProvider, event: IdentityEvent) -> Result<(), ProviderError> {
    match event {
        IdentityEvent::UserUpserted(user) => {
            let chat_user = ChatUser::from(&user);
            chat.upsert_user(&chat_user).await?;
            info!(user_id = %chat_user.id, "User synced to chat");
        }
        IdentityEvent::UserDeleted { id } => {
            chat.delete_user(&id, DeleteUserOptions::PURGE).await?;
            info!(user_id = %id, "User deleted from chat");
        }
        IdentityEvent::Other(event_type) => {
            debug!(event_type = %event_type, "Ignoring webhook event");
        }
    }
    Ok(())
}
