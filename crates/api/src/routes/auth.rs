//! Authentication routes for register and login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use tresor_db::entities::sea_orm_active_enums::{AccountKind, UserRole};
use tresor_db::repositories::user::UserError;
use tresor_db::{AccountRepository, UserRepository};
use tresor_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// POST /auth/register - Register a new customer.
///
/// A default current account is opened for the new user right away, so
/// a freshly registered customer can deposit without a second call.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if payload.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "weak_password",
                "message": "Password must be at least 8 characters"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo
        .create(
            &payload.email,
            &payload.password,
            &payload.full_name,
            UserRole::Customer,
        )
        .await
    {
        Ok(u) => u,
        Err(UserError::EmailTaken) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "email_exists",
                    "message": "An account with this email already exists"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Failed to register user");
            return crate::routes::internal_error();
        }
    };

    let account_repo = AccountRepository::new((*state.db).clone());
    if let Err(e) = account_repo.open_account(&user, AccountKind::Current).await {
        error!(error = %e, user_id = %user.id, "Failed to open default account");
        return crate::routes::internal_error();
    }

    let role = match user.role {
        UserRole::Customer => "customer",
        UserRole::Agent => "agent",
    };
    let access_token = match state.jwt_service.generate_access_token(user.id, role) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return crate::routes::internal_error();
        }
    };

    info!(user_id = %user.id, "User registered");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: role.to_string(),
        },
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::CREATED, Json(response)).into_response()
}

/// POST /auth/login - Authenticate a user and return a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    // An unknown email and a wrong password produce the same response.
    let user = match user_repo
        .verify_credentials(&payload.email, &payload.password)
        .await
    {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Failed login attempt");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return crate::routes::internal_error();
        }
    };

    let role = match user.role {
        UserRole::Customer => "customer",
        UserRole::Agent => "agent",
    };
    let access_token = match state.jwt_service.generate_access_token(user.id, role) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return crate::routes::internal_error();
        }
    };

    info!(user_id = %user.id, "User logged in");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: role.to_string(),
        },
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
