//! Account repository: opening, listing, and validating accounts.

use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use tresor_core::operation::UserRole;
use tresor_core::validation::ValidationStatus;

use crate::entities::{
    account_validations, accounts, operations, sea_orm_active_enums::AccountKind, users,
};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found (or not visible to the caller).
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Caller lacks the agent capability.
    #[error("Only agents can validate accounts")]
    Forbidden,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Account repository for CRUD and validation-log operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens an account for a user.
    ///
    /// Customer accounts receive a system-issued approving validation
    /// in the same transaction (agent NULL); accounts for any other
    /// role start unvalidated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operations fail.
    pub async fn open_account(
        &self,
        user: &users::Model,
        kind: AccountKind,
    ) -> Result<accounts::Model, AccountError> {
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();

        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            reference: Set(generate_reference()),
            kind: Set(kind),
            balance: Set(rust_decimal::Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let account = account.insert(&txn).await?;

        // Agent-held accounts go through the normal validation queue.
        if !UserRole::from(user.role.clone()).is_agent() {
            let validation = account_validations::ActiveModel {
                id: Set(Uuid::new_v4()),
                account_id: Set(account.id),
                agent_id: Set(None),
                approved: Set(true),
                created_at: Set(now),
            };
            validation.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok(account)
    }

    /// Lists all accounts belonging to a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Finds an account owned by a specific user.
    ///
    /// A miss and another user's account are indistinguishable: both
    /// are `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such account is visible to the user.
    pub async fn find_for_user(
        &self,
        account_id: Uuid,
        user_id: Uuid,
    ) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))
    }

    /// Finds an account regardless of owner. Transfer destinations use
    /// this; everything else goes through [`Self::find_for_user`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn find_by_id(&self, account_id: Uuid) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))
    }

    /// Lists operations touching an account from either side, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_operations(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<operations::Model>, DbErr> {
        operations::Entity::find()
            .filter(
                Condition::any()
                    .add(operations::Column::SourceAccountId.eq(account_id))
                    .add(operations::Column::DestinationAccountId.eq(account_id)),
            )
            .order_by_desc(operations::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Current validation status of an account: the latest log row, or
    /// pending when the log is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn validation_status(&self, account_id: Uuid) -> Result<ValidationStatus, DbErr> {
        let latest = account_validations::Entity::find()
            .filter(account_validations::Column::AccountId.eq(account_id))
            .order_by_desc(account_validations::Column::CreatedAt)
            .one(&self.db)
            .await?;

        Ok(ValidationStatus::from_latest(latest.map(|v| v.approved)))
    }

    /// Appends an agent validation decision to an account's log.
    ///
    /// The log is append-only, so a later approval supersedes an
    /// earlier rejection and vice versa.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-agent callers and `NotFound` if the
    /// account does not exist.
    pub async fn authorize(
        &self,
        account_id: Uuid,
        agent: &users::Model,
        approved: bool,
    ) -> Result<account_validations::Model, AccountError> {
        if !UserRole::from(agent.role.clone()).is_agent() {
            return Err(AccountError::Forbidden);
        }

        accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        let validation = account_validations::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(account_id),
            agent_id: Set(Some(agent.id)),
            approved: Set(approved),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(validation.insert(&self.db).await?)
    }
}

/// Generates an opaque IBAN-like account reference.
///
/// Uniqueness is enforced by the column constraint; no check digits.
fn generate_reference() -> String {
    let mut rng = rand::rng();
    let digits: String = (0..24).map(|_| rng.random_range(0..10).to_string()).collect();
    format!("TR{digits}")
}
