//! Operation repository: creating deposits, withdrawals, and transfers.
//!
//! Validation gates and amount checks run before any row is written;
//! a rejected operation leaves no trace. Deposits are decided and
//! applied synchronously; withdrawals and transfers are written
//! pending and wait for an agent.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use tresor_core::ledger::{check_funds, LedgerError, Movement};
use tresor_core::operation::{OperationKind, UserRole};
use tresor_core::validation::{ensure_validated, AccountSide, ValidationError, ValidationStatus};

use crate::entities::{account_validations, accounts, decisions, operations, users};

/// Error types for operation creation and listing.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// Operation not found.
    #[error("Operation not found: {0}")]
    NotFound(Uuid),

    /// Account not found (or not visible to the caller).
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Caller lacks the agent capability.
    #[error("Only agents can list pending operations")]
    Forbidden,

    /// Amount or funds rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// An implicated account is not validated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Operation repository.
#[derive(Debug, Clone)]
pub struct OperationRepository {
    db: DatabaseConnection,
}

impl OperationRepository {
    /// Creates a new operation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates and synchronously applies a deposit onto one of the
    /// user's accounts.
    ///
    /// The operation, its NULL-agent approving decision, and the
    /// balance increment are committed atomically; the returned model
    /// is already `processed`.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account is not the user's,
    /// `Validation` if the account is not validated, `Ledger` for a
    /// non-positive amount.
    pub async fn create_deposit(
        &self,
        account_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
    ) -> Result<operations::Model, OperationError> {
        let account = self.owned_account(account_id, user_id).await?;
        let movement = Movement::new(OperationKind::Deposit, None, Some(account.id), amount)?;
        self.gate(account.id, AccountSide::Destination).await?;

        let txn = self.db.begin().await?;
        let now = chrono::Utc::now();

        // Lock the row so the increment cannot race a concurrent apply.
        let locked = accounts::Entity::find_by_id(account.id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(OperationError::AccountNotFound(account.id))?;

        let operation = operations::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(OperationKind::Deposit.into()),
            source_account_id: Set(None),
            destination_account_id: Set(Some(account.id)),
            amount: Set(movement.amount()),
            processed: Set(true),
            created_at: Set(now.into()),
        };
        let operation = operation.insert(&txn).await?;

        let decision = decisions::ActiveModel {
            operation_id: Set(operation.id),
            agent_id: Set(None),
            approved: Set(true),
            created_at: Set(now.into()),
        };
        decision.insert(&txn).await?;

        let mut active: accounts::ActiveModel = locked.clone().into();
        active.balance = Set(locked.balance + movement.destination_delta());
        active.updated_at = Set(now.into());
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(operation)
    }

    /// Creates a pending withdrawal from one of the user's accounts.
    ///
    /// Funds are checked now against the current balance and will be
    /// checked again under lock if an agent approves.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `Validation`, or `Ledger` (invalid
    /// amount, insufficient funds) without writing anything.
    pub async fn create_withdrawal(
        &self,
        account_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
    ) -> Result<operations::Model, OperationError> {
        let account = self.owned_account(account_id, user_id).await?;
        let movement = Movement::new(OperationKind::Withdrawal, Some(account.id), None, amount)?;
        self.gate(account.id, AccountSide::Source).await?;
        check_funds(account.balance, movement.amount())?;

        let operation = operations::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(OperationKind::Withdrawal.into()),
            source_account_id: Set(Some(account.id)),
            destination_account_id: Set(None),
            amount: Set(movement.amount()),
            processed: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(operation.insert(&self.db).await?)
    }

    /// Creates a pending transfer from one of the user's accounts to
    /// any validated account.
    ///
    /// Gate failures name the failing side so the caller can tell a
    /// bad source from a bad destination.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for either side, `Ledger` for a bad
    /// amount or same-account transfer or insufficient funds,
    /// `Validation` naming the unvalidated side.
    pub async fn create_transfer(
        &self,
        source_id: Uuid,
        destination_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
    ) -> Result<operations::Model, OperationError> {
        let source = self.owned_account(source_id, user_id).await?;
        let destination = accounts::Entity::find_by_id(destination_id)
            .one(&self.db)
            .await?
            .ok_or(OperationError::AccountNotFound(destination_id))?;

        let movement = Movement::new(
            OperationKind::Transfer,
            Some(source.id),
            Some(destination.id),
            amount,
        )?;
        self.gate(source.id, AccountSide::Source).await?;
        self.gate(destination.id, AccountSide::Destination).await?;
        check_funds(source.balance, movement.amount())?;

        let operation = operations::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(OperationKind::Transfer.into()),
            source_account_id: Set(Some(source.id)),
            destination_account_id: Set(Some(destination.id)),
            amount: Set(movement.amount()),
            processed: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(operation.insert(&self.db).await?)
    }

    /// Lists undecided operations, oldest first. Agent only.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-agent callers.
    pub async fn list_pending(
        &self,
        caller: &users::Model,
    ) -> Result<Vec<operations::Model>, OperationError> {
        if !UserRole::from(caller.role.clone()).is_agent() {
            return Err(OperationError::Forbidden);
        }

        Ok(operations::Entity::find()
            .filter(operations::Column::Processed.eq(false))
            .order_by_asc(operations::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Finds an operation by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such operation exists.
    pub async fn find_by_id(&self, id: Uuid) -> Result<operations::Model, OperationError> {
        operations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OperationError::NotFound(id))
    }

    /// Loads an account owned by the user; a miss and another user's
    /// account are both `AccountNotFound`.
    async fn owned_account(
        &self,
        account_id: Uuid,
        user_id: Uuid,
    ) -> Result<accounts::Model, OperationError> {
        accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(OperationError::AccountNotFound(account_id))
    }

    /// Applies the validation gate to one side of the operation.
    async fn gate(&self, account_id: Uuid, side: AccountSide) -> Result<(), OperationError> {
        let latest = account_validations::Entity::find()
            .filter(account_validations::Column::AccountId.eq(account_id))
            .order_by_desc(account_validations::Column::CreatedAt)
            .one(&self.db)
            .await?;

        let status = ValidationStatus::from_latest(latest.map(|v| v.approved));
        ensure_validated(status, side)?;
        Ok(())
    }
}
