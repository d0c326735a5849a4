//! SQL schema for the Centavo SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
///
/// Soft delete is the nullable `deleted_at` column. Uniqueness (bank code,
/// tag name) is scoped to non-deleted rows via partial unique indexes whose
/// names are surfaced verbatim in constraint-violation responses.
/// AUTOINCREMENT keeps rowids from ever being reused, deleted or not.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS banks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    deleted_at  TEXT,
    code        TEXT NOT NULL,
    name        TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS banks_code_key
    ON banks(code) WHERE deleted_at IS NULL;

CREATE TABLE IF NOT EXISTS accounts (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    deleted_at     TEXT,
    name           TEXT NOT NULL,
    account_type   TEXT NOT NULL,  -- 'CHECKING' | 'SAVINGS' | 'SALARY' | 'INVESTMENT'
    bank_id        INTEGER REFERENCES banks(id),
    branch         TEXT,
    account_number TEXT,
    credit_limit   INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS histories (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    deleted_at   TEXT,
    name         TEXT NOT NULL,
    payment_date TEXT NOT NULL,
    amount       INTEGER NOT NULL DEFAULT 0,  -- cents
    account_id   INTEGER REFERENCES accounts(id)
);

CREATE TABLE IF NOT EXISTS provisions (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    deleted_at   TEXT,
    name         TEXT NOT NULL,
    initial_date TEXT NOT NULL,
    final_date   TEXT,
    amount       INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS tags (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    deleted_at  TEXT,
    name        TEXT NOT NULL,
    color       INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS tags_name_key
    ON tags(name) WHERE deleted_at IS NULL;

-- Tag assignments are plain join rows, replaced wholesale on update.
CREATE TABLE IF NOT EXISTS histories_tags (
    history_id INTEGER NOT NULL REFERENCES histories(id),
    tag_id     INTEGER NOT NULL REFERENCES tags(id),
    PRIMARY KEY (history_id, tag_id)
);

CREATE INDEX IF NOT EXISTS accounts_bank_idx     ON accounts(bank_id);
CREATE INDEX IF NOT EXISTS histories_account_idx ON histories(account_id);

PRAGMA user_version = 1;
";
