//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use tresor_core::auth::{hash_password, verify_password, PasswordError};

use crate::entities::{accounts, operations, sea_orm_active_enums::UserRole, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Email is already registered.
    #[error("Email already registered")]
    EmailTaken,

    /// User still has operations on their accounts.
    #[error("User accounts still carry operations and cannot be deleted")]
    OperationsRetained,

    /// Password hashing or verification failure.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new user, hashing the password before storage.
    ///
    /// # Errors
    ///
    /// Returns `EmailTaken` if the email is already registered, or an
    /// error if hashing or the insert fails.
    pub async fn create(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: UserRole,
    ) -> Result<users::Model, UserError> {
        if self.email_exists(email).await? {
            return Err(UserError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_lowercase()),
            password_hash: Set(password_hash),
            full_name: Set(full_name.to_string()),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email.to_lowercase()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Verifies login credentials against the stored hash.
    ///
    /// Returns `None` for an unknown email or a wrong password; the
    /// caller cannot distinguish the two.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or hash verification fails for a
    /// reason other than a mismatch.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<users::Model>, UserError> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Deletes a user and, by cascade, their accounts and validations.
    ///
    /// # Errors
    ///
    /// Returns `OperationsRetained` when any operation still references
    /// one of the user's accounts; the RESTRICT foreign keys would
    /// reject the cascade anyway, this surfaces it as a domain error.
    pub async fn delete(&self, user_id: Uuid) -> Result<(), UserError> {
        let txn = self.db.begin().await?;

        let user = users::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        let account_ids: Vec<Uuid> = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .select_only()
            .column(accounts::Column::Id)
            .into_tuple()
            .all(&txn)
            .await?;

        if !account_ids.is_empty() {
            let referencing = operations::Entity::find()
                .filter(
                    Condition::any()
                        .add(operations::Column::SourceAccountId.is_in(account_ids.clone()))
                        .add(operations::Column::DestinationAccountId.is_in(account_ids)),
                )
                .count(&txn)
                .await?;

            if referencing > 0 {
                return Err(UserError::OperationsRetained);
            }
        }

        user.delete(&txn).await?;
        txn.commit().await?;

        Ok(())
    }
}
