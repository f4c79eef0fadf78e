use axum::{Json, extract::State};
use tracing::debug;

use huddle_types::api::UsersResponse;
use huddle_types::models::ChatUser;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/users: the identity provider's user list as `{id, name, image}`.
/// Always fetched fresh.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let directory = state
        .directory
        .as_ref()
        .ok_or(ApiError::DirectoryNotConfigured)?;

    let records = directory.list_users().await.map_err(ApiError::Directory)?;
    let users: Vec<ChatUser> = records.iter().map(ChatUser::from).collect();

    debug!(count = users.len(), "Served user directory");
    Ok(Json(UsersResponse { users }))
}
