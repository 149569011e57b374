//! Middleware for the API layer.

pub mod auth;

pub use auth::{auth_middleware, AuthUser};
