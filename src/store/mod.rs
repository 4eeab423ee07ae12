//! SQLite-backed persistence — projects, environments, secrets, tokens.
//!
//! This module provides:
//! - The `Database` handle with schema bootstrap (`mod.rs`)
//! - Project rows (`projects`)
//! - Environment rows (`environments`)
//! - The versioned, encrypted `SecretStore` (`secrets`)
//! - CLI token rows (`tokens`)

pub mod environments;
pub mod projects;
pub mod secrets;
pub mod tokens;

use std::path::Path;

use chrono::{DateTime, Utc};
use rand::RngCore;
use rusqlite::Connection;

use crate::errors::{EnvPushError, Result};

// Re-export the most commonly used items.
pub use secrets::SecretStore;
pub use tokens::TokenStore;

/// Owner of the SQLite connection.  All query modules borrow from here.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file at `path` and ensure the schema
    /// exists.  Foreign keys are switched on so environment deletion
    /// cascades to secrets.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::bootstrap(conn)
    }

    /// Open an in-memory database (used by tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS projects (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                slug       TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS environments (
                id         TEXT PRIMARY KEY,
                project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                name       TEXT NOT NULL,
                slug       TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (project_id, slug)
            );

            CREATE TABLE IF NOT EXISTS secrets (
                id              TEXT PRIMARY KEY,
                environment_id  TEXT NOT NULL REFERENCES environments(id) ON DELETE CASCADE,
                key             TEXT NOT NULL,
                encrypted_value TEXT NOT NULL,
                version         INTEGER NOT NULL DEFAULT 1,
                updated_by      TEXT NOT NULL,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL,
                UNIQUE (environment_id, key)
            );

            CREATE TABLE IF NOT EXISTS cli_tokens (
                id           TEXT PRIMARY KEY,
                name         TEXT NOT NULL,
                token_hash   TEXT NOT NULL UNIQUE,
                last_used_at TEXT,
                expires_at   TEXT NOT NULL,
                created_at   TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS audit_log (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp     TEXT NOT NULL,
                actor         TEXT NOT NULL,
                action        TEXT NOT NULL,
                resource_type TEXT NOT NULL,
                resource_id   TEXT NOT NULL,
                details       TEXT
            );",
        )?;

        Ok(Self { conn })
    }

    /// Borrow the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Mutably borrow the underlying connection (for transactions).
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

/// Generate a random 128-bit row id, hex encoded.
pub(crate) fn new_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    let mut id = String::with_capacity(32);
    for b in bytes {
        id.push_str(&format!("{b:02x}"));
    }
    id
}

/// Current time as the RFC 3339 string we store in timestamp columns.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Parse a stored RFC 3339 timestamp back into a `DateTime<Utc>`.
///
/// A corrupt value falls back to the Unix epoch, which renders as an
/// obviously ancient age instead of masquerading as a fresh write.
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map_or(DateTime::<Utc>::UNIX_EPOCH, |dt| dt.with_timezone(&Utc))
}

/// Map a SQLite uniqueness violation onto our `Conflict` error.
pub(crate) fn map_constraint(err: rusqlite::Error, what: &str) -> EnvPushError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            EnvPushError::Conflict(what.to_string())
        }
        _ => EnvPushError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_hex_and_unique() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(id.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_ne!(id, new_id());
    }

    #[test]
    fn corrupt_timestamps_parse_to_the_epoch() {
        let valid = now_rfc3339();
        assert_ne!(parse_timestamp(&valid), DateTime::<Utc>::UNIX_EPOCH);

        assert_eq!(parse_timestamp("not-a-date"), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(parse_timestamp(""), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        // Running the schema batch again must not fail.
        drop(db);
        let _db = Database::open_in_memory().unwrap();
    }
}
