//! Self-service user routes.

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::delete,
};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};
use tresor_db::UserRepository;
use tresor_db::repositories::user::UserError;

/// Creates the user self-service routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/users/me", delete(delete_me))
}

/// DELETE /users/me - Delete the caller and their accounts.
///
/// Refused while any operation still references one of the caller's
/// accounts.
async fn delete_me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());

    match repo.delete(auth.user_id()).await {
        Ok(()) => {
            info!(user_id = %auth.user_id(), "User deleted their account");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(UserError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "user_not_found",
                "message": "User not found"
            })),
        )
            .into_response(),
        Err(UserError::OperationsRetained) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "operations_retained",
                "message": "Accounts with operations cannot be deleted"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to delete user");
            crate::routes::internal_error()
        }
    }
}
