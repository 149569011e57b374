//! Application-wide error taxonomy.
//!
//! Every caller-facing rejection in the system maps onto one of these
//! variants; the API layer uses `status_code` / `error_code` to render
//! a structured JSON body. Internal invariant violations are reported
//! as `Internal` and never carry user-actionable detail.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Display carries the human-readable detail only; the category is
/// conveyed by `error_code`, so rendered bodies never repeat it.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("{0}")]
    Unauthorized(String),

    /// Capability check failed (non-agent attempting an agent-only action).
    #[error("{0}")]
    Forbidden(String),

    /// Unknown account, operation, or user.
    #[error("{0}")]
    NotFound(String),

    /// Requested amount is zero or negative.
    #[error("{0}")]
    InvalidAmount(String),

    /// Source account balance does not cover the requested amount.
    #[error("{0}")]
    InsufficientFunds(String),

    /// Transfer source and destination are the same account.
    #[error("{0}")]
    SameAccountTransfer(String),

    /// Account has no validation decision yet.
    #[error("{0}")]
    NotYetValidated(String),

    /// Account's most recent validation decision was a rejection.
    #[error("{0}")]
    NotValidated(String),

    /// Operation already carries a decision.
    #[error("{0}")]
    AlreadyDecided(String),

    /// Malformed or otherwise invalid request data.
    #[error("{0}")]
    Validation(String),

    /// Conflict (e.g., duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// Database error.
    #[error("{0}")]
    Database(String),

    /// Internal invariant violation (programmer error).
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::InvalidAmount(_) | Self::SameAccountTransfer(_) | Self::Validation(_) => 400,
            Self::InsufficientFunds(_) | Self::NotYetValidated(_) | Self::NotValidated(_) => 422,
            Self::AlreadyDecided(_) | Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::InsufficientFunds(_) => "insufficient_funds",
            Self::SameAccountTransfer(_) => "same_account_transfer",
            Self::NotYetValidated(_) => "account_not_yet_validated",
            Self::NotValidated(_) => "account_not_validated",
            Self::AlreadyDecided(_) => "already_decided",
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::Database(_) => "database_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Unauthorized(String::new()).status_code(), 401);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::InvalidAmount(String::new()).status_code(), 400);
        assert_eq!(AppError::SameAccountTransfer(String::new()).status_code(), 400);
        assert_eq!(AppError::InsufficientFunds(String::new()).status_code(), 422);
        assert_eq!(AppError::NotYetValidated(String::new()).status_code(), 422);
        assert_eq!(AppError::NotValidated(String::new()).status_code(), 422);
        assert_eq!(AppError::AlreadyDecided(String::new()).status_code(), 409);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::Forbidden(String::new()).error_code(), "forbidden");
        assert_eq!(AppError::NotFound(String::new()).error_code(), "not_found");
        assert_eq!(
            AppError::InsufficientFunds(String::new()).error_code(),
            "insufficient_funds"
        );
        assert_eq!(
            AppError::AlreadyDecided(String::new()).error_code(),
            "already_decided"
        );
        assert_eq!(
            AppError::NotYetValidated(String::new()).error_code(),
            "account_not_yet_validated"
        );
    }

    #[test]
    fn test_error_display_is_detail_only() {
        assert_eq!(
            AppError::InsufficientFunds("requested 50, available 10".into()).to_string(),
            "requested 50, available 10"
        );
        assert_eq!(
            AppError::AlreadyDecided("operation has a decision".into()).to_string(),
            "operation has a decision"
        );
    }
}
