use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::Uri,
};
use tracing::debug;

use huddle_types::api::{TokenQuery, TokenRequest, TokenResponse};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/stream-token?userId=…
pub async fn token_from_query(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<TokenResponse>, ApiError> {
    let query = Query::<TokenQuery>::try_from_uri(&uri)
        .map(|Query(q)| q)
        .unwrap_or_default();
    issue_token(&state, query.user_id)
}

/// POST /api/stream-token with `{"userId": "…"}`. An unreadable body is
/// treated the same as a missing `userId`.
pub async fn token_from_body(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TokenResponse>, ApiError> {
    let req: TokenRequest = serde_json::from_slice(&body).unwrap_or_default();
    issue_token(&state, req.user_id)
}

fn issue_token(state: &AppState, user_id: Option<String>) -> Result<Json<TokenResponse>, ApiError> {
    let user_id = user_id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingUserId)?;

    let chat = state.chat.as_ref().ok_or(ApiError::ChatNotConfigured)?;
    let token = chat.create_token(&user_id).map_err(ApiError::TokenSigning)?;

    debug!(user_id = %user_id, "Issued chat token");
    Ok(Json(TokenResponse { token }))
}
