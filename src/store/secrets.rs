//! The versioned, encrypted secret store.
//!
//! `SecretStore` wraps the database and the crypto envelope so the rest
//! of the application works with plaintext `SecretEntry` values and never
//! sees ciphertext.
//!
//! Write semantics are **full replace**: `upsert_many` makes the key set
//! for an environment exactly equal to the incoming set, deleting
//! anything not included.  Every kept key is re-encrypted and its version
//! bumped on every write, whether or not the plaintext changed — the
//! version is a write counter, not a content-change signal.  Callers that
//! need "did this change" diff plaintext themselves (see `crate::sync`).

use std::collections::{BTreeMap, HashMap, HashSet};

use rusqlite::{params, params_from_iter, TransactionBehavior};

use crate::crypto::{decrypt, encrypt, MasterKey};
use crate::envfile;
use crate::errors::{EnvPushError, Result};
use crate::model::{DecryptedSecret, SecretEntry};

use super::{environments, map_constraint, new_id, now_rfc3339, parse_timestamp, Database};

/// Maximum length of a secret key.
const MAX_KEY_LEN: usize = 256;

/// Handle over the database and master key for one batch of operations.
pub struct SecretStore<'a> {
    db: &'a mut Database,
    master_key: &'a MasterKey,
}

impl<'a> SecretStore<'a> {
    pub fn new(db: &'a mut Database, master_key: &'a MasterKey) -> Self {
        Self { db, master_key }
    }

    /// Read and decrypt every secret in an environment, ordered by key.
    ///
    /// A decryption failure on any row aborts the whole read — partial
    /// or corrupt data is never returned.
    pub fn list(&self, environment_id: &str) -> Result<Vec<DecryptedSecret>> {
        let conn = self.db.conn();

        if environments::find_by_id(conn, environment_id)?.is_none() {
            return Err(EnvPushError::EnvironmentNotFound(environment_id.to_string()));
        }

        let mut stmt = conn.prepare(
            "SELECT key, encrypted_value, version, updated_by, updated_at
             FROM secrets WHERE environment_id = ?1 ORDER BY key",
        )?;

        let rows = stmt.query_map(params![environment_id], |row| {
            let updated_at: String = row.get(4)?;
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                updated_at,
            ))
        })?;

        let mut secrets = Vec::new();
        for row in rows {
            let (key, encrypted_value, version, updated_by, updated_at) = row?;
            let value = decrypt(&encrypted_value, self.master_key)?;
            secrets.push(DecryptedSecret {
                key,
                value,
                version,
                updated_by,
                updated_at: parse_timestamp(&updated_at),
            });
        }

        Ok(secrets)
    }

    /// Decrypt an environment's secrets into a plaintext key/value map.
    pub fn snapshot(&self, environment_id: &str) -> Result<HashMap<String, String>> {
        Ok(self
            .list(environment_id)?
            .into_iter()
            .map(|s| (s.key, s.value))
            .collect())
    }

    /// Full-replace upsert: after this call the environment's key set
    /// equals exactly the keys of `incoming`.
    ///
    /// Executed as one IMMEDIATE transaction — either the full set of
    /// deletes/inserts/updates commits, or none do.  Concurrent writers
    /// on the same environment serialize here; last committed wins.
    pub fn upsert_many(
        &mut self,
        environment_id: &str,
        incoming: &[SecretEntry],
        updated_by: &str,
    ) -> Result<()> {
        // Reject malformed input before touching the database.
        let mut seen: HashSet<&str> = HashSet::with_capacity(incoming.len());
        for entry in incoming {
            validate_key(&entry.key)?;
            if !seen.insert(&entry.key) {
                return Err(EnvPushError::Validation(format!(
                    "duplicate key '{}' in incoming set",
                    entry.key
                )));
            }
        }

        let tx = self
            .db
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if environments::find_by_id(&tx, environment_id)?.is_none() {
            return Err(EnvPushError::EnvironmentNotFound(environment_id.to_string()));
        }

        // Snapshot existing rows: key -> (row id, current version).
        let existing: HashMap<String, (String, i64)> = {
            let mut stmt = tx.prepare(
                "SELECT key, id, version FROM secrets WHERE environment_id = ?1",
            )?;
            let rows = stmt.query_map(params![environment_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    (row.get::<_, String>(1)?, row.get::<_, i64>(2)?),
                ))
            })?;

            let mut map = HashMap::new();
            for row in rows {
                let (key, id_version) = row?;
                map.insert(key, id_version);
            }
            map
        };

        // Delete keys absent from the incoming set (all rows when empty).
        if incoming.is_empty() {
            tx.execute(
                "DELETE FROM secrets WHERE environment_id = ?1",
                params![environment_id],
            )?;
        } else {
            let placeholders = vec!["?"; incoming.len()].join(", ");
            let sql = format!(
                "DELETE FROM secrets WHERE environment_id = ? AND key NOT IN ({placeholders})"
            );
            let args = std::iter::once(environment_id.to_string())
                .chain(incoming.iter().map(|e| e.key.clone()));
            tx.execute(&sql, params_from_iter(args))?;
        }

        // Insert new keys at version 1; re-encrypt and bump the rest.
        let now = now_rfc3339();
        for entry in incoming {
            let encrypted_value = encrypt(&entry.value, self.master_key)?;

            match existing.get(&entry.key) {
                None => {
                    tx.execute(
                        "INSERT INTO secrets
                             (id, environment_id, key, encrypted_value, version,
                              updated_by, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6, ?6)",
                        params![
                            new_id(),
                            environment_id,
                            entry.key,
                            encrypted_value,
                            updated_by,
                            now
                        ],
                    )
                    .map_err(|e| {
                        map_constraint(e, &format!("secret '{}' already exists", entry.key))
                    })?;
                }
                Some((row_id, version)) => {
                    tx.execute(
                        "UPDATE secrets
                         SET encrypted_value = ?1, version = ?2, updated_by = ?3, updated_at = ?4
                         WHERE id = ?5",
                        params![encrypted_value, version + 1, updated_by, now, row_id],
                    )?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Remove exactly one key.  No-op if the key is absent.
    pub fn delete_key(&mut self, environment_id: &str, key: &str) -> Result<()> {
        self.db.conn().execute(
            "DELETE FROM secrets WHERE environment_id = ?1 AND key = ?2",
            params![environment_id, key],
        )?;
        Ok(())
    }

    /// Render an environment's secrets as `.env` text: `KEY=value` lines
    /// sorted by key, trailing newline when nonempty.
    ///
    /// No quoting is applied — values containing newlines are not
    /// round-trip safe through the codec.
    pub fn export(&self, environment_id: &str) -> Result<String> {
        let vars: BTreeMap<String, String> = self
            .list(environment_id)?
            .into_iter()
            .map(|s| (s.key, s.value))
            .collect();

        Ok(envfile::serialize(&vars))
    }
}

/// Validate that a secret key is safe.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be non-empty and at most 256 characters.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(EnvPushError::Validation("secret key cannot be empty".into()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(EnvPushError::Validation(format!(
            "secret key cannot exceed {MAX_KEY_LEN} characters"
        )));
    }
    if !key
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(EnvPushError::Validation(format!(
            "secret key '{key}' contains invalid characters — only ASCII letters, digits, underscores, hyphens, and periods are allowed"
        )));
    }
    Ok(())
}
