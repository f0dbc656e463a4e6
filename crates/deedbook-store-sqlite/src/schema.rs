//! SQL schema for the deedbook SQLite store.
//!
//! Executed on every open; `PRAGMA user_version` records the layout so later
//! migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS clients (
    client_id       TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    phone           TEXT,
    tax_id          TEXT NOT NULL,
    status          TEXT NOT NULL,   -- 'active' | 'inactive' | 'pending'
    marital_status  TEXT,
    property_regime TEXT,
    -- No foreign key: a link may outlive its target and is then ignored.
    spouse_id       TEXT,
    wedding_date    TEXT,            -- ISO 8601 date
    father_name     TEXT,
    mother_name     TEXT,
    created_at      TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS clients_tax_id_idx ON clients(tax_id);

PRAGMA user_version = 1;
";
