//! Account management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::operations::OperationResponse;
use crate::{AppState, middleware::AuthUser};
use tresor_core::validation::ValidationStatus;
use tresor_db::AccountRepository;
use tresor_db::entities::{accounts, sea_orm_active_enums::AccountKind};
use tresor_db::repositories::account::AccountError;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/{account_id}", get(get_account))
        .route("/accounts/{account_id}/approval", post(approve_account))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for opening an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account kind: "current" or "savings". Defaults to current.
    pub kind: Option<String>,
}

/// Request body for an agent validation decision.
#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    /// Whether the agent approves the account.
    pub approved: bool,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Opaque external reference.
    pub reference: String,
    /// Account kind.
    pub kind: String,
    /// Current balance.
    pub balance: String,
    /// Current validation status.
    pub validation_status: String,
    /// Created at timestamp.
    pub created_at: String,
}

impl AccountResponse {
    pub(crate) fn from_model(account: accounts::Model, status: ValidationStatus) -> Self {
        Self {
            id: account.id,
            reference: account.reference,
            kind: match account.kind {
                AccountKind::Current => "current".to_string(),
                AccountKind::Savings => "savings".to_string(),
            },
            balance: account.balance.to_string(),
            validation_status: status.as_str().to_string(),
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

fn account_error_response(err: &AccountError) -> Response {
    match err {
        AccountError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "account_not_found",
                "message": "Account not found"
            })),
        )
            .into_response(),
        AccountError::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Only agents can validate accounts"
            })),
        )
            .into_response(),
        AccountError::Database(e) => {
            error!(error = %e, "Database error in account route");
            crate::routes::internal_error()
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /accounts - List the caller's accounts.
async fn list_accounts(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    let accounts = match repo.list_for_user(auth.user_id()).await {
        Ok(a) => a,
        Err(e) => {
            error!(error = %e, "Failed to list accounts");
            return crate::routes::internal_error();
        }
    };

    let mut items = Vec::with_capacity(accounts.len());
    for account in accounts {
        let status = match repo.validation_status(account.id).await {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "Failed to load validation status");
                return crate::routes::internal_error();
            }
        };
        items.push(AccountResponse::from_model(account, status));
    }

    (StatusCode::OK, Json(json!({ "accounts": items }))).into_response()
}

/// POST /accounts - Open a new account for the caller.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let kind = match payload.kind.as_deref() {
        None | Some("current") => AccountKind::Current,
        Some("savings") => AccountKind::Savings,
        Some(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_account_kind",
                    "message": "Account kind must be 'current' or 'savings'"
                })),
            )
                .into_response();
        }
    };

    let user = match crate::routes::load_current_user(&state, &auth).await {
        Ok(u) => u,
        Err(response) => return response,
    };

    let repo = AccountRepository::new((*state.db).clone());
    match repo.open_account(&user, kind).await {
        Ok(account) => {
            info!(account_id = %account.id, user_id = %user.id, "Account opened");
            let status = repo
                .validation_status(account.id)
                .await
                .unwrap_or(ValidationStatus::Pending);
            (
                StatusCode::CREATED,
                Json(AccountResponse::from_model(account, status)),
            )
                .into_response()
        }
        Err(e) => account_error_response(&e),
    }
}

/// GET /accounts/{account_id} - Account detail with its operations
/// from both sides.
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    let account = match repo.find_for_user(account_id, auth.user_id()).await {
        Ok(a) => a,
        Err(e) => return account_error_response(&e),
    };

    let status = match repo.validation_status(account.id).await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to load validation status");
            return crate::routes::internal_error();
        }
    };

    let operations = match repo.list_operations(account.id).await {
        Ok(ops) => ops,
        Err(e) => {
            error!(error = %e, "Failed to list account operations");
            return crate::routes::internal_error();
        }
    };

    let operations: Vec<OperationResponse> = operations
        .into_iter()
        .map(OperationResponse::from_model)
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "account": AccountResponse::from_model(account, status),
            "operations": operations,
        })),
    )
        .into_response()
}

/// POST /accounts/{account_id}/approval - Agent validation decision.
///
/// Appends to the account's validation log; a later call supersedes an
/// earlier one.
async fn approve_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<ApprovalRequest>,
) -> impl IntoResponse {
    let user = match crate::routes::load_current_user(&state, &auth).await {
        Ok(u) => u,
        Err(response) => return response,
    };

    let repo = AccountRepository::new((*state.db).clone());
    match repo.authorize(account_id, &user, payload.approved).await {
        Ok(validation) => {
            info!(
                account_id = %account_id,
                agent_id = %user.id,
                approved = payload.approved,
                "Account validation recorded"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "account_id": validation.account_id,
                    "approved": validation.approved,
                    "created_at": validation.created_at.to_rfc3339(),
                })),
            )
                .into_response()
        }
        Err(e) => account_error_response(&e),
    }
}
