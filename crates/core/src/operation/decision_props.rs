//! Property tests for the decision state machine.

use proptest::prelude::*;

use crate::operation::decision::{DecisionAction, DecisionService};
use crate::operation::error::DecisionError;
use crate::operation::types::{OperationStatus, UserRole};

fn status_strategy() -> impl Strategy<Value = OperationStatus> {
    prop_oneof![
        Just(OperationStatus::Pending),
        Just(OperationStatus::Approved),
        Just(OperationStatus::Rejected),
        Just(OperationStatus::Applied),
    ]
}

fn role_strategy() -> impl Strategy<Value = UserRole> {
    prop_oneof![Just(UserRole::Customer), Just(UserRole::Agent)]
}

proptest! {
    /// A decision is accepted iff the operation is pending and the
    /// caller is an agent; no other combination ever mutates anything.
    #[test]
    fn prop_decision_gate(
        status in status_strategy(),
        role in role_strategy(),
        approve in any::<bool>(),
    ) {
        let service = DecisionService::new();
        let result = service.decide(status, role, approve);

        match (status.is_pending(), role.is_agent()) {
            (true, true) => {
                let expected = if approve {
                    DecisionAction::RecordApprovalAndApply
                } else {
                    DecisionAction::RecordRejection
                };
                prop_assert_eq!(result, Ok(expected));
            }
            (false, _) => {
                prop_assert_eq!(
                    result,
                    Err(DecisionError::AlreadyDecided(status.as_str()))
                );
            }
            (true, false) => {
                prop_assert_eq!(result, Err(DecisionError::Forbidden));
            }
        }
    }
}
