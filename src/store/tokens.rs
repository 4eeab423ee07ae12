//! CLI bearer token rows.
//!
//! The raw token is returned exactly once at creation; only its SHA-256
//! hash is stored.  Verification looks the hash up, rejects expired
//! tokens, and touches `last_used_at`.

use chrono::{Duration, Utc};
use rusqlite::{params, OptionalExtension};

use crate::crypto::{generate_raw_token, hash_token, verify_token};
use crate::errors::{EnvPushError, Result};
use crate::model::CliToken;

use super::{map_constraint, new_id, now_rfc3339, parse_timestamp, Database};

/// Default token lifetime in days.
pub const DEFAULT_EXPIRY_DAYS: i64 = 90;

pub struct TokenStore<'a> {
    db: &'a Database,
}

impl<'a> TokenStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Mint a new token.  Returns the raw token (show it once) and the
    /// stored record.
    pub fn create(&self, name: &str, expiry_days: Option<i64>) -> Result<(String, CliToken)> {
        if name.trim().is_empty() {
            return Err(EnvPushError::Validation("token name cannot be empty".into()));
        }

        let raw = generate_raw_token();
        let token_hash = hash_token(&raw);
        let id = new_id();
        let created_at = now_rfc3339();
        let expires_at =
            (Utc::now() + Duration::days(expiry_days.unwrap_or(DEFAULT_EXPIRY_DAYS))).to_rfc3339();

        self.db
            .conn()
            .execute(
                "INSERT INTO cli_tokens (id, name, token_hash, expires_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, name, token_hash, expires_at, created_at],
            )
            .map_err(|e| map_constraint(e, "token hash collision"))?;

        let record = CliToken {
            id,
            name: name.to_string(),
            token_hash,
            last_used_at: None,
            expires_at: parse_timestamp(&expires_at),
            created_at: parse_timestamp(&created_at),
        };

        Ok((raw, record))
    }

    /// Verify a presented raw token.
    ///
    /// Returns the matching record if the hash matches (constant-time
    /// compare) and the token has not expired.  Updates `last_used_at`.
    pub fn verify(&self, raw: &str) -> Result<Option<CliToken>> {
        let token_hash = hash_token(raw);

        let found = self
            .db
            .conn()
            .query_row(
                "SELECT id, name, token_hash, last_used_at, expires_at, created_at
                 FROM cli_tokens WHERE token_hash = ?1",
                params![token_hash],
                row_to_token,
            )
            .optional()?;

        let Some(token) = found else {
            return Ok(None);
        };

        // Constant-time recheck of the presented token against the stored hash.
        if !verify_token(raw, &token.token_hash) {
            return Ok(None);
        }

        if token.expires_at <= Utc::now() {
            return Ok(None);
        }

        self.db.conn().execute(
            "UPDATE cli_tokens SET last_used_at = ?1 WHERE id = ?2",
            params![now_rfc3339(), token.id],
        )?;

        Ok(Some(token))
    }

    /// List all tokens, newest first.
    pub fn list(&self) -> Result<Vec<CliToken>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, token_hash, last_used_at, expires_at, created_at
             FROM cli_tokens ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map([], row_to_token)?;

        let mut tokens = Vec::new();
        for row in rows {
            tokens.push(row?);
        }
        Ok(tokens)
    }

    /// Revoke a token by name.
    pub fn revoke(&self, name: &str) -> Result<()> {
        let deleted = self
            .db
            .conn()
            .execute("DELETE FROM cli_tokens WHERE name = ?1", params![name])?;

        if deleted == 0 {
            return Err(EnvPushError::TokenNotFound(name.to_string()));
        }
        Ok(())
    }
}

fn row_to_token(row: &rusqlite::Row<'_>) -> rusqlite::Result<CliToken> {
    let last_used_at: Option<String> = row.get(3)?;
    let expires_at: String = row.get(4)?;
    let created_at: String = row.get(5)?;

    Ok(CliToken {
        id: row.get(0)?,
        name: row.get(1)?,
        token_hash: row.get(2)?,
        last_used_at: last_used_at.as_deref().map(parse_timestamp),
        expires_at: parse_timestamp(&expires_at),
        created_at: parse_timestamp(&created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_verify_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let store = TokenStore::new(&db);

        let (raw, record) = store.create("laptop", None).unwrap();
        assert!(raw.starts_with("evp_"));
        assert_eq!(record.name, "laptop");

        let verified = store.verify(&raw).unwrap();
        assert!(verified.is_some());
        assert!(verified.unwrap().last_used_at.is_none()); // read before touch

        // last_used_at is set after the first verification.
        let again = store.verify(&raw).unwrap().unwrap();
        assert!(again.last_used_at.is_some());
    }

    #[test]
    fn verify_rejects_unknown_and_expired() {
        let db = Database::open_in_memory().unwrap();
        let store = TokenStore::new(&db);

        assert!(store.verify("evp_nonsense").unwrap().is_none());

        let (raw, _) = store.create("expired", Some(-1)).unwrap();
        assert!(store.verify(&raw).unwrap().is_none());
    }

    #[test]
    fn revoke_removes_token() {
        let db = Database::open_in_memory().unwrap();
        let store = TokenStore::new(&db);

        let (raw, _) = store.create("ci", None).unwrap();
        store.revoke("ci").unwrap();
        assert!(store.verify(&raw).unwrap().is_none());

        assert!(matches!(
            store.revoke("ci"),
            Err(EnvPushError::TokenNotFound(_))
        ));
    }

    #[test]
    fn raw_token_is_never_stored() {
        let db = Database::open_in_memory().unwrap();
        let store = TokenStore::new(&db);

        let (raw, record) = store.create("audit-check", None).unwrap();
        assert_ne!(raw, record.token_hash);

        let stored: String = db
            .conn()
            .query_row("SELECT token_hash FROM cli_tokens", [], |row| row.get(0))
            .unwrap();
        assert_ne!(stored, raw);
    }
}
