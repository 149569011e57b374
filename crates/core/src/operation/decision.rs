//! The decision state machine.
//!
//! Stateless: callers load the operation, ask the service what a
//! decision means, and persist the outcome. The ordering of checks is
//! part of the contract — a missing operation is reported before an
//! already-decided one, and an already-decided one before a forbidden
//! caller, so a customer probing a decided operation learns nothing
//! about their own permissions.

use crate::operation::error::DecisionError;
use crate::operation::types::{OperationKind, OperationStatus, UserRole};

/// What the storage layer must do after a decision is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionAction {
    /// Record the rejection; balances are untouched.
    RecordRejection,
    /// Record the approval and apply the movement under row locks.
    RecordApprovalAndApply,
}

/// Stateless decision engine for operations.
///
/// Pure state-machine logic; persistence and locking live in the
/// storage layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionService;

impl DecisionService {
    /// Creates a new decision service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an agent decision against an operation's status.
    ///
    /// Check order: decidability of the operation first, capability of
    /// the caller second. `AlreadyDecided` therefore wins over
    /// `Forbidden` when both apply.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyDecided` if the operation is no longer pending,
    /// `Forbidden` if the role is not agent.
    pub fn decide(
        &self,
        status: OperationStatus,
        role: UserRole,
        approve: bool,
    ) -> Result<DecisionAction, DecisionError> {
        if !status.is_pending() {
            return Err(DecisionError::AlreadyDecided(status.as_str()));
        }
        if !role.is_agent() {
            return Err(DecisionError::Forbidden);
        }

        if approve {
            Ok(DecisionAction::RecordApprovalAndApply)
        } else {
            Ok(DecisionAction::RecordRejection)
        }
    }

    /// System decision taken at creation time, bypassing the agent
    /// capability check. Only deposits qualify; they are approved and
    /// applied synchronously, with no agent on the decision record.
    #[must_use]
    pub const fn auto_decide(&self, kind: OperationKind) -> Option<DecisionAction> {
        if kind.is_auto_approved() {
            Some(DecisionAction::RecordApprovalAndApply)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_can_approve_pending() {
        let service = DecisionService::new();
        let action = service
            .decide(OperationStatus::Pending, UserRole::Agent, true)
            .unwrap();
        assert_eq!(action, DecisionAction::RecordApprovalAndApply);
    }

    #[test]
    fn test_agent_can_reject_pending() {
        let service = DecisionService::new();
        let action = service
            .decide(OperationStatus::Pending, UserRole::Agent, false)
            .unwrap();
        assert_eq!(action, DecisionAction::RecordRejection);
    }

    #[test]
    fn test_customer_cannot_decide() {
        let service = DecisionService::new();
        let result = service.decide(OperationStatus::Pending, UserRole::Customer, true);
        assert_eq!(result, Err(DecisionError::Forbidden));
    }

    #[test]
    fn test_decided_operations_are_final() {
        let service = DecisionService::new();
        for status in [
            OperationStatus::Approved,
            OperationStatus::Rejected,
            OperationStatus::Applied,
        ] {
            let result = service.decide(status, UserRole::Agent, true);
            assert_eq!(result, Err(DecisionError::AlreadyDecided(status.as_str())));
        }
    }

    #[test]
    fn test_already_decided_wins_over_forbidden() {
        // A customer probing a decided operation must not learn whether
        // they would otherwise have been allowed.
        let service = DecisionService::new();
        let result = service.decide(OperationStatus::Rejected, UserRole::Customer, true);
        assert_eq!(result, Err(DecisionError::AlreadyDecided("rejected")));
    }

    #[test]
    fn test_auto_decide_only_for_deposits() {
        let service = DecisionService::new();
        assert_eq!(
            service.auto_decide(OperationKind::Deposit),
            Some(DecisionAction::RecordApprovalAndApply)
        );
        assert_eq!(service.auto_decide(OperationKind::Withdrawal), None);
        assert_eq!(service.auto_decide(OperationKind::Transfer), None);
    }
}
