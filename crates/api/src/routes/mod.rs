//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::auth::auth_middleware, middleware::AuthUser};
use tresor_db::UserRepository;
use tresor_db::entities::users;
use tresor_shared::AppError;

pub mod accounts;
pub mod auth;
pub mod health;
pub mod operations;
pub mod users_me;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(health::routes()).merge(auth::routes())
}

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(accounts::routes())
        .merge(operations::routes())
        .merge(users_me::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Loads the authenticated user's row.
///
/// A valid token whose user no longer exists (self-deleted account) is
/// treated as unauthorized.
pub(crate) async fn load_current_user(
    state: &AppState,
    auth: &AuthUser,
) -> Result<users::Model, Response> {
    let repo = UserRepository::new((*state.db).clone());
    match repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "unknown_user",
                "message": "The authenticated user no longer exists"
            })),
        )
            .into_response()),
        Err(e) => {
            error!(error = %e, "Failed to load authenticated user");
            Err(internal_error())
        }
    }
}

/// Renders an [`AppError`] as the standard `{error, message}` JSON body.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "error": err.error_code(), "message": err.to_string() })),
    )
        .into_response()
}

/// The generic 500 body used when a database error leaks through.
pub(crate) fn internal_error() -> Response {
    error_response(&AppError::Internal("An error occurred".to_string()))
}
