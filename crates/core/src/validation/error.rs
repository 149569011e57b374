//! Validation gate error types.

use thiserror::Error;

use crate::validation::AccountSide;

/// Errors raised by the account validation gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The account has never been through validation.
    #[error("The {0} account has not been validated yet")]
    NotYetValidated(AccountSide),

    /// The latest validation rejected the account.
    #[error("The {0} account failed validation")]
    NotValidated(AccountSide),
}
