//! Decision error types.

use thiserror::Error;

/// Errors that can occur when recording a decision on an operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecisionError {
    /// The deciding user does not carry the agent capability.
    #[error("Only agents can decide operations")]
    Forbidden,

    /// The operation already carries a decision.
    #[error("Operation has already been decided (status: {0})")]
    AlreadyDecided(&'static str),
}
