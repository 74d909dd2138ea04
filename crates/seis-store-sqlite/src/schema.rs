//! SQL schema for the SQLite reading store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per reading. Rows are never updated.
CREATE TABLE IF NOT EXISTS readings (
    reading_id  INTEGER PRIMARY KEY,
    date        TEXT NOT NULL,   -- 'YYYY-MM-DD'; day may exceed the month length
    frequency   REAL NOT NULL CHECK (frequency > 0 AND frequency < 1000),
    recorded_at TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS readings_date_idx ON readings(date);

PRAGMA user_version = 1;
";
