//! Initial database migration.
//!
//! Creates principals, organizations, wallets, transactions, and the policy
//! table. Wallet balances are constrained non-negative at the storage layer
//! too, so a conditional update that races past the application check still
//! cannot overdraw.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(WALLETS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(POLICY_RULES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(255) NOT NULL UNIQUE,
    email VARCHAR(255) NOT NULL UNIQUE,
    first_name VARCHAR(255) NOT NULL,
    last_name VARCHAR(255) NOT NULL,
    password_hash VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_username_lower ON users(lower(username));
";

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const WALLETS_SQL: &str = r"
CREATE TABLE wallets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    balance NUMERIC(19, 2) NOT NULL DEFAULT 0,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_wallet_balance_non_negative CHECK (balance >= 0)
);

CREATE INDEX idx_wallets_organization ON wallets(organization_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    notes TEXT NOT NULL DEFAULT '',
    approved BOOLEAN NOT NULL DEFAULT false,
    entry_date_time TIMESTAMPTZ NOT NULL DEFAULT now(),
    spend_date_time TIMESTAMPTZ NOT NULL,
    transaction_value NUMERIC(19, 2) NOT NULL,
    wallet_id UUID NOT NULL REFERENCES wallets(id) ON DELETE CASCADE,
    creator_id UUID NOT NULL REFERENCES users(id),
    reviewer_id UUID NOT NULL REFERENCES users(id),

    CONSTRAINT chk_transaction_reviewer_not_creator CHECK (reviewer_id <> creator_id)
);

CREATE INDEX idx_transactions_wallet_entry ON transactions(wallet_id, entry_date_time DESC);
";

const POLICY_RULES_SQL: &str = r"
CREATE TABLE policy_rules (
    id BIGSERIAL PRIMARY KEY,
    ptype VARCHAR(8) NOT NULL,
    v0 VARCHAR(255) NOT NULL,
    v1 VARCHAR(255) NOT NULL,
    v2 VARCHAR(255) NOT NULL,
    v3 VARCHAR(255) NOT NULL DEFAULT '',

    CONSTRAINT uq_policy_rules UNIQUE (ptype, v0, v1, v2, v3),
    CONSTRAINT chk_policy_rules_ptype CHECK (ptype IN ('p', 'g'))
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS policy_rules;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS wallets;
DROP TABLE IF EXISTS organizations;
DROP TABLE IF EXISTS users;
";
