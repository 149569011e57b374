//! Credential handling.
//!
//! Passwords are only ever stored as Argon2id PHC hashes; login
//! verifies against the hash, never by comparing plaintext.

pub mod password;

pub use password::{hash_password, verify_password, PasswordError};
