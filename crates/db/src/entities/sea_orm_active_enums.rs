//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maps the `user_role` Postgres enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular bank customer.
    #[sea_orm(string_value = "customer")]
    Customer,
    /// Bank agent with decision capabilities.
    #[sea_orm(string_value = "agent")]
    Agent,
}

impl From<UserRole> for tresor_core::operation::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Customer => Self::Customer,
            UserRole::Agent => Self::Agent,
        }
    }
}

impl From<tresor_core::operation::UserRole> for UserRole {
    fn from(role: tresor_core::operation::UserRole) -> Self {
        match role {
            tresor_core::operation::UserRole::Customer => Self::Customer,
            tresor_core::operation::UserRole::Agent => Self::Agent,
        }
    }
}

/// Maps the `account_kind` Postgres enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_kind")]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Everyday checking account. The default on signup.
    #[sea_orm(string_value = "current")]
    Current,
    /// Savings account.
    #[sea_orm(string_value = "savings")]
    Savings,
}

/// Maps the `operation_kind` Postgres enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "operation_kind")]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Money entering the system.
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Money leaving the system.
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
    /// Money moving between accounts.
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

impl From<OperationKind> for tresor_core::operation::OperationKind {
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Deposit => Self::Deposit,
            OperationKind::Withdrawal => Self::Withdrawal,
            OperationKind::Transfer => Self::Transfer,
        }
    }
}

impl From<tresor_core::operation::OperationKind> for OperationKind {
    fn from(kind: tresor_core::operation::OperationKind) -> Self {
        match kind {
            tresor_core::operation::OperationKind::Deposit => Self::Deposit,
            tresor_core::operation::OperationKind::Withdrawal => Self::Withdrawal,
            tresor_core::operation::OperationKind::Transfer => Self::Transfer,
        }
    }
}
