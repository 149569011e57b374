//! Operation routes: deposits, withdrawals, transfers, the pending
//! queue, and agent decisions.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use tresor_core::ledger::LedgerError;
use tresor_core::validation::ValidationError;
use tresor_db::entities::{operations, sea_orm_active_enums::OperationKind};
use tresor_db::repositories::approval::ApprovalError;
use tresor_db::repositories::operation::OperationError;
use tresor_db::{ApprovalRepository, OperationRepository};
use tresor_shared::AppError;

/// Creates the operation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/{account_id}/deposit", post(deposit))
        .route("/accounts/{account_id}/withdrawal", post(withdrawal))
        .route("/accounts/{account_id}/transfer", post(transfer))
        .route("/operations/pending", get(list_pending))
        .route("/operations/{operation_id}/decision", post(decide))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for deposits and withdrawals.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    /// Amount as a decimal string.
    pub amount: String,
}

/// Request body for transfers.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Destination account ID.
    pub destination_account_id: Uuid,
    /// Amount as a decimal string.
    pub amount: String,
}

/// Request body for an agent decision.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// Whether the agent approves the operation.
    pub approve: bool,
}

/// Response for an operation.
#[derive(Debug, Serialize)]
pub struct OperationResponse {
    /// Operation ID.
    pub id: Uuid,
    /// Operation kind.
    pub kind: String,
    /// Source account, if any.
    pub source_account_id: Option<Uuid>,
    /// Destination account, if any.
    pub destination_account_id: Option<Uuid>,
    /// Positive magnitude.
    pub amount: String,
    /// Whether a decision has settled the operation.
    pub processed: bool,
    /// Created at timestamp.
    pub created_at: String,
}

impl OperationResponse {
    pub(crate) fn from_model(op: operations::Model) -> Self {
        Self {
            id: op.id,
            kind: match op.kind {
                OperationKind::Deposit => "deposit".to_string(),
                OperationKind::Withdrawal => "withdrawal".to_string(),
                OperationKind::Transfer => "transfer".to_string(),
            },
            source_account_id: op.source_account_id,
            destination_account_id: op.destination_account_id,
            amount: op.amount.to_string(),
            processed: op.processed,
            created_at: op.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

fn ledger_error_response(err: &LedgerError) -> Response {
    let app_err = match err {
        LedgerError::InvalidAmount(_) => {
            AppError::InvalidAmount("Amount must be strictly positive".to_string())
        }
        LedgerError::SameAccountTransfer => {
            AppError::SameAccountTransfer("Cannot transfer to the same account".to_string())
        }
        LedgerError::InsufficientFunds {
            requested,
            available,
        } => AppError::InsufficientFunds(format!(
            "Insufficient funds: requested {requested}, available {available}"
        )),
        e => {
            // Shape violations are programmer errors, not user input.
            error!(error = %e, "Ledger invariant violation");
            return crate::routes::internal_error();
        }
    };

    crate::routes::error_response(&app_err)
}

fn validation_error_response(err: &ValidationError) -> Response {
    let app_err = match err {
        ValidationError::NotYetValidated(_) => AppError::NotYetValidated(err.to_string()),
        ValidationError::NotValidated(_) => AppError::NotValidated(err.to_string()),
    };

    crate::routes::error_response(&app_err)
}

fn operation_error_response(err: &OperationError) -> Response {
    match err {
        OperationError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "operation_not_found",
                "message": "Operation not found"
            })),
        )
            .into_response(),
        OperationError::AccountNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "account_not_found",
                "message": "Account not found"
            })),
        )
            .into_response(),
        OperationError::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Only agents can list pending operations"
            })),
        )
            .into_response(),
        OperationError::Ledger(e) => ledger_error_response(e),
        OperationError::Validation(e) => validation_error_response(e),
        OperationError::Database(e) => {
            error!(error = %e, "Database error in operation route");
            crate::routes::internal_error()
        }
    }
}

fn approval_error_response(err: &ApprovalError) -> Response {
    match err {
        ApprovalError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "operation_not_found",
                "message": "Operation not found"
            })),
        )
            .into_response(),
        ApprovalError::AlreadyDecided => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "already_decided",
                "message": "Operation has already been decided"
            })),
        )
            .into_response(),
        ApprovalError::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Only agents can decide operations"
            })),
        )
            .into_response(),
        ApprovalError::Ledger(e) => ledger_error_response(e),
        ApprovalError::MissingAccount(id) => {
            error!(account_id = %id, "Operation references a missing account");
            crate::routes::internal_error()
        }
        ApprovalError::Database(e) => {
            error!(error = %e, "Database error in decision route");
            crate::routes::internal_error()
        }
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, Response> {
    Decimal::from_str(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": "Invalid amount format"
            })),
        )
            .into_response()
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /accounts/{account_id}/deposit - Deposit into one's own
/// account. Applied synchronously.
async fn deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<AmountRequest>,
) -> impl IntoResponse {
    let amount = match parse_amount(&payload.amount) {
        Ok(a) => a,
        Err(response) => return response,
    };

    let repo = OperationRepository::new((*state.db).clone());
    match repo.create_deposit(account_id, auth.user_id(), amount).await {
        Ok(operation) => {
            info!(operation_id = %operation.id, %account_id, "Deposit applied");
            (
                StatusCode::CREATED,
                Json(OperationResponse::from_model(operation)),
            )
                .into_response()
        }
        Err(e) => operation_error_response(&e),
    }
}

/// POST /accounts/{account_id}/withdrawal - Request a withdrawal.
/// Stays pending until an agent decides.
async fn withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<AmountRequest>,
) -> impl IntoResponse {
    let amount = match parse_amount(&payload.amount) {
        Ok(a) => a,
        Err(response) => return response,
    };

    let repo = OperationRepository::new((*state.db).clone());
    match repo
        .create_withdrawal(account_id, auth.user_id(), amount)
        .await
    {
        Ok(operation) => {
            info!(operation_id = %operation.id, %account_id, "Withdrawal requested");
            (
                StatusCode::CREATED,
                Json(OperationResponse::from_model(operation)),
            )
                .into_response()
        }
        Err(e) => operation_error_response(&e),
    }
}

/// POST /accounts/{account_id}/transfer - Request a transfer to any
/// validated account. Stays pending until an agent decides.
async fn transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<TransferRequest>,
) -> impl IntoResponse {
    let amount = match parse_amount(&payload.amount) {
        Ok(a) => a,
        Err(response) => return response,
    };

    let repo = OperationRepository::new((*state.db).clone());
    match repo
        .create_transfer(
            account_id,
            payload.destination_account_id,
            auth.user_id(),
            amount,
        )
        .await
    {
        Ok(operation) => {
            info!(operation_id = %operation.id, %account_id, "Transfer requested");
            (
                StatusCode::CREATED,
                Json(OperationResponse::from_model(operation)),
            )
                .into_response()
        }
        Err(e) => operation_error_response(&e),
    }
}

/// GET /operations/pending - Undecided operations, oldest first.
/// Agent only.
async fn list_pending(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user = match crate::routes::load_current_user(&state, &auth).await {
        Ok(u) => u,
        Err(response) => return response,
    };

    let repo = OperationRepository::new((*state.db).clone());
    match repo.list_pending(&user).await {
        Ok(ops) => {
            let items: Vec<OperationResponse> =
                ops.into_iter().map(OperationResponse::from_model).collect();
            (StatusCode::OK, Json(json!({ "operations": items }))).into_response()
        }
        Err(e) => operation_error_response(&e),
    }
}

/// POST /operations/{operation_id}/decision - Agent decision.
///
/// Approvals apply the movement under row locks with a fresh funds
/// check; rejections settle the operation with no balance effect.
async fn decide(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(operation_id): Path<Uuid>,
    Json(payload): Json<DecisionRequest>,
) -> impl IntoResponse {
    let user = match crate::routes::load_current_user(&state, &auth).await {
        Ok(u) => u,
        Err(response) => return response,
    };

    let repo = ApprovalRepository::new((*state.db).clone());
    match repo.decide(operation_id, &user, payload.approve).await {
        Ok(operation) => {
            info!(
                %operation_id,
                agent_id = %user.id,
                approved = payload.approve,
                "Operation decided"
            );
            (
                StatusCode::OK,
                Json(OperationResponse::from_model(operation)),
            )
                .into_response()
        }
        Err(e) => approval_error_response(&e),
    }
}
