//! Initial database migration.
//!
//! Creates the credit-ledger tables, enums, indexes, and the `updated_at`
//! trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TABLES
        // ============================================================
        db.execute_unprepared(WALLETS_SQL).await?;
        db.execute_unprepared(CREDIT_LINES_SQL).await?;
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;

        // ============================================================
        // PART 3: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

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
-- Credit line lifecycle status
CREATE TYPE line_status AS ENUM (
    'ACTIVE',
    'PAID',
    'DEFAULTED'
);

-- Ledger movement kinds
CREATE TYPE ledger_kind AS ENUM (
    'deposit',
    'withdrawal',
    'transfer',
    'credit_purchase',
    'down_payment',
    'repayment',
    'interest_charged',
    'penalty_charged',
    'credit_limit_change'
);
";

const WALLETS_SQL: &str = r"
CREATE TABLE wallets (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL UNIQUE,
    cash_balance NUMERIC(12, 2) NOT NULL DEFAULT 0.00,
    savings_balance NUMERIC(12, 2) NOT NULL DEFAULT 0.00,
    credit_balance NUMERIC(12, 2) NOT NULL DEFAULT 0.00,
    credit_limit NUMERIC(12, 2) NOT NULL DEFAULT 500.00,
    credit_score INTEGER NOT NULL DEFAULT 600,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT wallets_cash_balance_non_negative CHECK (cash_balance >= 0),
    CONSTRAINT wallets_savings_balance_non_negative CHECK (savings_balance >= 0),
    CONSTRAINT wallets_credit_balance_non_negative CHECK (credit_balance >= 0),
    CONSTRAINT wallets_credit_limit_positive CHECK (credit_limit > 0),
    CONSTRAINT wallets_credit_score_bounded CHECK (credit_score BETWEEN 300 AND 1000)
);
";

const CREDIT_LINES_SQL: &str = r"
CREATE TABLE credit_lines (
    id UUID PRIMARY KEY,
    wallet_id UUID NOT NULL REFERENCES wallets(id) ON DELETE CASCADE,
    item_name TEXT NOT NULL DEFAULT 'Store Purchase',
    total_price NUMERIC(12, 2) NOT NULL,
    down_payment NUMERIC(12, 2) NOT NULL,
    principal NUMERIC(12, 2) NOT NULL,
    remaining_principal NUMERIC(12, 2) NOT NULL,
    interest_rate NUMERIC(5, 2) NOT NULL,
    penalty_rate NUMERIC(5, 2) NOT NULL,
    due_date DATE NOT NULL,
    status line_status NOT NULL DEFAULT 'ACTIVE',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT credit_lines_total_price_positive CHECK (total_price > 0),
    CONSTRAINT credit_lines_principal_positive CHECK (principal > 0),
    CONSTRAINT credit_lines_remaining_in_range
        CHECK (remaining_principal >= 0 AND remaining_principal <= principal)
);

-- Repayment allocation walks a wallet's open lines oldest-due-first
CREATE INDEX idx_credit_lines_wallet_status_due
    ON credit_lines (wallet_id, status, due_date);
";

const LEDGER_ENTRIES_SQL: &str = r"
-- Append-only: rows are never updated or deleted
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    wallet_id UUID NOT NULL REFERENCES wallets(id) ON DELETE CASCADE,
    kind ledger_kind NOT NULL,
    amount NUMERIC(12, 2) NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT ledger_entries_amount_non_negative CHECK (amount >= 0)
);

CREATE INDEX idx_ledger_entries_wallet_created
    ON ledger_entries (wallet_id, created_at DESC);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER wallets_set_updated_at
    BEFORE UPDATE ON wallets
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER credit_lines_set_updated_at
    BEFORE UPDATE ON credit_lines
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS ledger_entries;
DROP TABLE IF EXISTS credit_lines;
DROP TABLE IF EXISTS wallets;
DROP FUNCTION IF EXISTS set_updated_at();
DROP TYPE IF EXISTS ledger_kind;
DROP TYPE IF EXISTS line_status;
";
