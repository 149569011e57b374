//! Operation lifecycle management for Tresor.
//!
//! An operation is an immutable request for a monetary movement. It is
//! born pending, receives exactly one decision (an agent's, or the
//! system's for deposits), and — if approved — is applied to balances
//! exactly once.
//!
//! # Modules
//!
//! - `types` - Domain types (OperationKind, OperationStatus, UserRole)
//! - `error` - Decision-specific error types
//! - `decision` - The decision state machine

pub mod decision;
pub mod error;
pub mod types;

#[cfg(test)]
mod decision_props;

pub use decision::{DecisionAction, DecisionService};
pub use error::DecisionError;
pub use types::{OperationKind, OperationStatus, UserRole};
