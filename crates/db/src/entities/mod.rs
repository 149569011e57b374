//! `SeaORM` entity definitions.

pub mod account_validations;
pub mod accounts;
pub mod decisions;
pub mod operations;
pub mod sea_orm_active_enums;
pub mod users;
