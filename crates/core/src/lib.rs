//! Core business logic for Tresor.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and the decision state machine live here.
//!
//! # Modules
//!
//! - `ledger` - Balance movement rules (deltas, funds checks)
//! - `operation` - Operation lifecycle and decision state machine
//! - `validation` - Account validation gate
//! - `auth` - Password hashing

pub mod auth;
pub mod ledger;
pub mod operation;
pub mod validation;
