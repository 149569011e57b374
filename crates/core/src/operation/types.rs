//! Operation domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of monetary movement an operation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Money entering the system onto a destination account.
    Deposit,
    /// Money leaving the system from a source account.
    Withdrawal,
    /// Money moving between two accounts.
    Transfer,
}

impl OperationKind {
    /// Parse a kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(Self::Deposit),
            "withdrawal" => Some(Self::Withdrawal),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }

    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
        }
    }

    /// Deposits are auto-approved by the system at creation time.
    #[must_use]
    pub const fn is_auto_approved(&self) -> bool {
        matches!(self, Self::Deposit)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an operation.
///
/// `Pending` means no decision exists yet. A decision moves the
/// operation to `Approved` or `Rejected`; approved operations become
/// `Applied` once the balance mutation has run. `Rejected` and
/// `Applied` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    /// No decision yet.
    Pending,
    /// Decision exists with a positive outcome; not yet applied.
    Approved,
    /// Decision exists with a negative outcome. Terminal.
    Rejected,
    /// Balance mutation has run. Terminal.
    Applied,
}

impl OperationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Applied => "applied",
        }
    }

    /// Whether a decision may still be recorded.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User role.
///
/// Only agents may decide operations and account validations; the
/// check fails closed, so an unknown role never grants the capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular bank customer.
    Customer,
    /// Bank agent, permitted to decide operations and validations.
    Agent,
}

impl UserRole {
    /// Parse a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "customer" => Some(Self::Customer),
            "agent" => Some(Self::Agent),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Agent => "agent",
        }
    }

    /// Whether this role carries the decision capability.
    #[must_use]
    pub const fn is_agent(&self) -> bool {
        matches!(self, Self::Agent)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_roundtrip() {
        assert_eq!(OperationKind::parse("deposit"), Some(OperationKind::Deposit));
        assert_eq!(
            OperationKind::parse("WITHDRAWAL"),
            Some(OperationKind::Withdrawal)
        );
        assert_eq!(OperationKind::parse("Transfer"), Some(OperationKind::Transfer));
        assert_eq!(OperationKind::parse("loan"), None);
    }

    #[test]
    fn test_only_deposits_auto_approve() {
        assert!(OperationKind::Deposit.is_auto_approved());
        assert!(!OperationKind::Withdrawal.is_auto_approved());
        assert!(!OperationKind::Transfer.is_auto_approved());
    }

    #[test]
    fn test_status_pending() {
        assert!(OperationStatus::Pending.is_pending());
        assert!(!OperationStatus::Approved.is_pending());
        assert!(!OperationStatus::Rejected.is_pending());
        assert!(!OperationStatus::Applied.is_pending());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("agent"), Some(UserRole::Agent));
        assert_eq!(UserRole::parse("CUSTOMER"), Some(UserRole::Customer));
        assert_eq!(UserRole::parse("banquier"), None);
    }

    #[test]
    fn test_role_capability_fails_closed() {
        assert!(UserRole::Agent.is_agent());
        assert!(!UserRole::Customer.is_agent());
    }
}
