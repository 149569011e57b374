//! Account validation gate.
//!
//! Validations are an append-only log per account; the current status
//! is whatever the latest row says, `Pending` when no row exists yet.
//! Every balance-affecting operation must pass [`ensure_validated`] on
//! each account it touches before it is even created.

pub mod error;

pub use error::ValidationError;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of an operation an account sits on.
///
/// Carried in gate failures so a transfer rejection names the failing
/// side rather than a bare account id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountSide {
    /// The account money is taken from.
    Source,
    /// The account money is added to.
    Destination,
}

impl AccountSide {
    /// Returns the string representation of the side.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Destination => "destination",
        }
    }
}

impl fmt::Display for AccountSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current validation status of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// No validation decision recorded yet.
    Pending,
    /// Latest validation approved the account.
    Approved,
    /// Latest validation rejected the account.
    Rejected,
}

impl ValidationStatus {
    /// Derives the current status from the latest log entry, if any.
    #[must_use]
    pub const fn from_latest(latest_approved: Option<bool>) -> Self {
        match latest_approved {
            None => Self::Pending,
            Some(true) => Self::Approved,
            Some(false) => Self::Rejected,
        }
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gates an operation side on the account's validation status.
///
/// # Errors
///
/// Returns `NotYetValidated` when no validation exists, `NotValidated`
/// when the latest validation rejected the account. Both name the
/// failing side.
pub const fn ensure_validated(
    status: ValidationStatus,
    side: AccountSide,
) -> Result<(), ValidationError> {
    match status {
        ValidationStatus::Approved => Ok(()),
        ValidationStatus::Pending => Err(ValidationError::NotYetValidated(side)),
        ValidationStatus::Rejected => Err(ValidationError::NotValidated(side)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_latest_log_entry() {
        assert_eq!(ValidationStatus::from_latest(None), ValidationStatus::Pending);
        assert_eq!(
            ValidationStatus::from_latest(Some(true)),
            ValidationStatus::Approved
        );
        assert_eq!(
            ValidationStatus::from_latest(Some(false)),
            ValidationStatus::Rejected
        );
    }

    #[test]
    fn test_approved_account_passes_gate() {
        assert!(ensure_validated(ValidationStatus::Approved, AccountSide::Source).is_ok());
        assert!(ensure_validated(ValidationStatus::Approved, AccountSide::Destination).is_ok());
    }

    #[test]
    fn test_pending_account_blocked_as_not_yet_validated() {
        let result = ensure_validated(ValidationStatus::Pending, AccountSide::Source);
        assert_eq!(result, Err(ValidationError::NotYetValidated(AccountSide::Source)));
    }

    #[test]
    fn test_rejected_account_blocked_as_not_validated() {
        let result = ensure_validated(ValidationStatus::Rejected, AccountSide::Destination);
        assert_eq!(
            result,
            Err(ValidationError::NotValidated(AccountSide::Destination))
        );
    }

    #[test]
    fn test_gate_failure_names_the_side() {
        let err = ensure_validated(ValidationStatus::Pending, AccountSide::Destination)
            .unwrap_err();
        assert!(err.to_string().contains("destination"));
    }
}
