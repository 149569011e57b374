//! Initial database migration.
//!
//! Creates the enums and the five core tables: users, accounts,
//! account_validations, operations, decisions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(ACCOUNT_VALIDATIONS_SQL).await?;
        db.execute_unprepared(OPERATIONS_SQL).await?;
        db.execute_unprepared(DECISIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- User roles
CREATE TYPE user_role AS ENUM ('customer', 'agent');

-- Account kinds
CREATE TYPE account_kind AS ENUM ('current', 'savings');

-- Operation kinds
CREATE TYPE operation_kind AS ENUM ('deposit', 'withdrawal', 'transfer');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'customer',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_users_email ON users(email);
";

const ACCOUNTS_SQL: &str = r"
-- Accounts die with their owner.
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    reference VARCHAR(34) NOT NULL UNIQUE,
    kind account_kind NOT NULL DEFAULT 'current',
    balance NUMERIC(15, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_accounts_user ON accounts(user_id);
";

const ACCOUNT_VALIDATIONS_SQL: &str = r"
-- Append-only validation log; latest row per account wins.
-- agent_id NULL = system-issued validation.
CREATE TABLE account_validations (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    agent_id UUID REFERENCES users(id) ON DELETE SET NULL,
    approved BOOLEAN NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_account_validations_account
    ON account_validations(account_id, created_at DESC);
";

const OPERATIONS_SQL: &str = r"
-- Amount is always the positive magnitude; signs are derived per side.
-- RESTRICT keeps an operation alive while either referenced account is.
CREATE TABLE operations (
    id UUID PRIMARY KEY,
    kind operation_kind NOT NULL,
    source_account_id UUID REFERENCES accounts(id) ON DELETE RESTRICT,
    destination_account_id UUID REFERENCES accounts(id) ON DELETE RESTRICT,
    amount NUMERIC(15, 2) NOT NULL CHECK (amount > 0),
    processed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_operation_shape CHECK (
        (kind = 'deposit' AND source_account_id IS NULL
            AND destination_account_id IS NOT NULL)
        OR (kind = 'withdrawal' AND source_account_id IS NOT NULL
            AND destination_account_id IS NULL)
        OR (kind = 'transfer' AND source_account_id IS NOT NULL
            AND destination_account_id IS NOT NULL
            AND source_account_id <> destination_account_id)
    )
);

CREATE INDEX idx_operations_source ON operations(source_account_id);
CREATE INDEX idx_operations_destination ON operations(destination_account_id);
CREATE INDEX idx_operations_processed ON operations(processed) WHERE NOT processed;
";

const DECISIONS_SQL: &str = r"
-- One decision per operation, enforced by the primary key.
-- agent_id NULL = system auto-decision (deposits).
CREATE TABLE decisions (
    operation_id UUID PRIMARY KEY REFERENCES operations(id) ON DELETE CASCADE,
    agent_id UUID REFERENCES users(id) ON DELETE SET NULL,
    approved BOOLEAN NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS decisions CASCADE;
DROP TABLE IF EXISTS operations CASCADE;
DROP TABLE IF EXISTS account_validations CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS operation_kind;
DROP TYPE IF EXISTS account_kind;
DROP TYPE IF EXISTS user_role;
";
