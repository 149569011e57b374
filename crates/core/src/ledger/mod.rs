//! Balance movement rules for Tresor.
//!
//! A `Movement` is the balance-affecting shape of an approved operation:
//! which account loses the amount, which account gains it. Construction
//! enforces the per-kind shape invariants; application order and locking
//! are the storage layer's concern.
//!
//! # Modules
//!
//! - `movement` - Movement construction and delta derivation
//! - `error` - Ledger-specific error types

pub mod error;
pub mod movement;

#[cfg(test)]
mod movement_props;

pub use error::LedgerError;
pub use movement::{Movement, check_funds};
