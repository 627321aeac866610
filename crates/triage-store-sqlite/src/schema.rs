//! SQL schema for the ticket store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per classified ticket. Rows are written once and never
-- updated or deleted by the service.
CREATE TABLE IF NOT EXISTS tickets (
    ticket_id    TEXT PRIMARY KEY,
    ticket_text  TEXT NOT NULL,
    category     TEXT NOT NULL,
    confidence   REAL NOT NULL,
    explanation  TEXT NOT NULL,
    model        TEXT NOT NULL,
    created_at   TEXT NOT NULL   -- RFC 3339 UTC, fixed microsecond precision
);

-- Serves the recent-tickets listing without a full scan.
CREATE INDEX IF NOT EXISTS tickets_created_idx ON tickets(created_at);

PRAGMA user_version = 1;
";
