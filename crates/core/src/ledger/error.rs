//! Ledger error types for balance movements.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when building or applying a movement.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Requested amount is zero or negative.
    #[error("Amount must be strictly positive, got {0}")]
    InvalidAmount(Decimal),

    /// Source account balance does not cover the requested amount.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The amount requested.
        requested: Decimal,
        /// The balance available on the source account.
        available: Decimal,
    },

    /// Transfer source and destination are the same account.
    #[error("Cannot transfer to the same account")]
    SameAccountTransfer,

    /// Operation kind requires a source account but none was given.
    ///
    /// Internal invariant violation, not a user-facing rejection.
    #[error("Operation kind {0} requires a source account")]
    MissingSource(&'static str),

    /// Operation kind requires a destination account but none was given.
    #[error("Operation kind {0} requires a destination account")]
    MissingDestination(&'static str),

    /// Operation kind forbids a source account but one was given.
    #[error("Operation kind {0} must not carry a source account")]
    UnexpectedSource(&'static str),

    /// Operation kind forbids a destination account but one was given.
    #[error("Operation kind {0} must not carry a destination account")]
    UnexpectedDestination(&'static str),
}
