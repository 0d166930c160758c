//! SQL schema for the augur SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `middle_name` is stored as an empty string rather than NULL so the
/// identity key `(given_name, family_name, middle_name)` behaves as a
/// proper unique constraint (NULLs never compare equal in SQLite unique
/// indexes). Rows are never deleted; `is_deleted` is flipped instead.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS persons (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    given_name   TEXT NOT NULL,
    family_name  TEXT NOT NULL,
    middle_name  TEXT NOT NULL DEFAULT '',
    age          INTEGER NOT NULL DEFAULT 0,
    gender       TEXT NOT NULL DEFAULT '',
    nationality  TEXT NOT NULL DEFAULT '',
    is_deleted   INTEGER NOT NULL DEFAULT 0,
    UNIQUE (given_name, family_name, middle_name)
);

CREATE INDEX IF NOT EXISTS persons_age_idx ON persons(age);

PRAGMA user_version = 1;
";
