//! Approval repository: agent decisions on pending operations.
//!
//! A decision is a single atomic unit: the decision row, the
//! `processed` flip, and (for approvals) the balance mutation commit
//! or roll back together. Account rows are locked in id order before
//! funds are re-checked, so two concurrently approved withdrawals
//! cannot both pass a stale funds check.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QuerySelect,
    Set, TransactionTrait,
};
use uuid::Uuid;

use tresor_core::ledger::{check_funds, LedgerError, Movement};
use tresor_core::operation::{
    DecisionAction, DecisionError, DecisionService, OperationStatus, UserRole,
};

use crate::entities::{accounts, decisions, operations, users};

/// Error types for the decision flow.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    /// Operation not found.
    #[error("Operation not found: {0}")]
    NotFound(Uuid),

    /// The operation already carries a decision.
    #[error("Operation has already been decided")]
    AlreadyDecided,

    /// Caller lacks the agent capability.
    #[error("Only agents can decide operations")]
    Forbidden,

    /// Movement construction or funds re-check failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// An account referenced by the operation no longer exists.
    ///
    /// RESTRICT foreign keys make this unreachable in practice; it is
    /// an internal invariant error, not a caller-facing rejection.
    #[error("Account {0} referenced by the operation is missing")]
    MissingAccount(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DecisionError> for ApprovalError {
    fn from(err: DecisionError) -> Self {
        match err {
            DecisionError::Forbidden => Self::Forbidden,
            DecisionError::AlreadyDecided(_) => Self::AlreadyDecided,
        }
    }
}

/// Approval repository driving the decision state machine against
/// storage.
#[derive(Debug, Clone)]
pub struct ApprovalRepository {
    db: DatabaseConnection,
    service: DecisionService,
}

impl ApprovalRepository {
    /// Creates a new approval repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            service: DecisionService::new(),
        }
    }

    /// Records an agent's decision on an operation.
    ///
    /// Check order: existence, then decidability, then capability —
    /// so a customer probing a decided operation sees the conflict,
    /// not their own permission failure.
    ///
    /// On approval the movement is applied under row locks with a
    /// fresh funds check; an approval that no longer fits fails with
    /// `InsufficientFunds` and leaves the operation pending.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AlreadyDecided`, `Forbidden`, or `Ledger`
    /// when the re-checked funds do not cover the amount.
    pub async fn decide(
        &self,
        operation_id: Uuid,
        agent: &users::Model,
        approve: bool,
    ) -> Result<operations::Model, ApprovalError> {
        let txn = self.db.begin().await?;

        // Lock the operation row itself so concurrent decisions on the
        // same operation serialize here.
        let operation = operations::Entity::find_by_id(operation_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ApprovalError::NotFound(operation_id))?;

        let status = if operation.processed {
            // Terminal either way; the state machine only needs to know
            // it is no longer pending.
            OperationStatus::Applied
        } else {
            OperationStatus::Pending
        };

        let action = self
            .service
            .decide(status, UserRole::from(agent.role.clone()), approve)?;

        let now = chrono::Utc::now();

        if action == DecisionAction::RecordApprovalAndApply {
            let movement = Movement::new(
                tresor_core::operation::OperationKind::from(operation.kind.clone()),
                operation.source_account_id,
                operation.destination_account_id,
                operation.amount,
            )?;
            apply_movement(&txn, &movement, now).await?;
        }

        let decision = decisions::ActiveModel {
            operation_id: Set(operation.id),
            agent_id: Set(Some(agent.id)),
            approved: Set(approve),
            created_at: Set(now.into()),
        };
        decision.insert(&txn).await?;

        let mut active: operations::ActiveModel = operation.into();
        active.processed = Set(true);
        let operation = active.update(&txn).await?;

        txn.commit().await?;
        Ok(operation)
    }
}

/// Applies a movement's deltas under exclusive row locks.
///
/// Rows are locked in ascending id order so two transfers touching the
/// same pair of accounts in opposite directions cannot deadlock.
async fn apply_movement(
    txn: &DatabaseTransaction,
    movement: &Movement,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<(), ApprovalError> {
    let mut ids: Vec<Uuid> = movement
        .source()
        .into_iter()
        .chain(movement.destination())
        .collect();
    ids.sort_unstable();

    let mut locked = Vec::with_capacity(ids.len());
    for id in ids {
        let account = accounts::Entity::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(ApprovalError::MissingAccount(id))?;
        locked.push(account);
    }

    if let Some(source_id) = movement.source() {
        let source = locked
            .iter()
            .find(|a| a.id == source_id)
            .ok_or(ApprovalError::MissingAccount(source_id))?;
        check_funds(source.balance, movement.amount())?;
    }

    for account in locked {
        let delta = if movement.source() == Some(account.id) {
            movement.source_delta()
        } else {
            movement.destination_delta()
        };

        let balance = account.balance + delta;
        let mut active: accounts::ActiveModel = account.into();
        active.balance = Set(balance);
        active.updated_at = Set(now.into());
        active.update(txn).await?;
    }

    Ok(())
}
