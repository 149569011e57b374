//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod approval;
pub mod operation;
pub mod user;

pub use account::{AccountError, AccountRepository};
pub use approval::{ApprovalError, ApprovalRepository};
pub use operation::{OperationError, OperationRepository};
pub use user::{UserError, UserRepository};
