use axum::{
    Json, Router,
    routing::{get, post},
};

use huddle_types::api::HealthResponse;

use crate::error::ApiError;
use crate::state::AppState;
use crate::{token, users, webhooks};

/// All public routes. Cross-cutting layers (CORS, tracing) are added by the
/// binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/stream-token",
            get(token::token_from_query)
                .post(token::token_from_body)
                .fallback(method_not_allowed),
        )
        .route("/api/users", get(users::list_users).fallback(method_not_allowed))
        .route(
            "/api/webhooks/clerk",
            post(webhooks::clerk_webhook).fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .with_state(state)
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}
