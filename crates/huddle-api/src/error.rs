use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use huddle_types::api::ErrorBody;
use huddle_webhook::WebhookError;

use crate::providers::ProviderError;

/// Every failure an endpoint can report. The display string is the exact
/// `error` text sent to the caller; underlying causes are only logged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("userId required")]
    MissingUserId,

    #[error("Stream credentials missing")]
    ChatNotConfigured,

    #[error("Clerk secret key missing")]
    DirectoryNotConfigured,

    #[error("Webhook secret missing")]
    WebhookNotConfigured,

    #[error("Missing svix headers")]
    MissingSignatureHeaders,

    #[error("Webhook verification failed")]
    Verification(#[source] WebhookError),

    #[error("Invalid webhook payload")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Failed to generate token")]
    TokenSigning(#[source] ProviderError),

    #[error("Failed to fetch users")]
    Directory(#[source] ProviderError),

    #[error("Webhook processing failed")]
    WebhookProcessing(#[source] ProviderError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingUserId
            | Self::MissingSignatureHeaders
            | Self::Verification(_)
            | Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::ChatNotConfigured
            | Self::DirectoryNotConfigured
            | Self::WebhookNotConfigured
            | Self::TokenSigning(_)
            | Self::Directory(_)
            | Self::WebhookProcessing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn cause(&self) -> Option<String> {
        match self {
            Self::Verification(e) => Some(e.to_string()),
            Self::InvalidPayload(e) => Some(e.to_string()),
            Self::TokenSigning(e) | Self::Directory(e) | Self::WebhookProcessing(e) => {
                Some(e.to_string())
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let cause = self.cause().unwrap_or_default();
        if status.is_server_error() {
            error!(status = status.as_u16(), cause = %cause, "{}", self);
        } else {
            warn!(status = status.as_u16(), cause = %cause, "{}", self);
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
