//! Flat records shared between the store, sync engine, and CLI.
//!
//! Entities are plain structs related by id fields — the store owns all
//! persistence, nothing here holds a connection or a key.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::EnvPushError;

/// A project groups environments under a unique slug.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// A named secret namespace within a project (e.g. "production").
///
/// The `(project_id, slug)` pair is unique; deleting an environment
/// cascades its secrets.
#[derive(Debug, Clone)]
pub struct Environment {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// A secret row as stored: the value is an encrypted envelope.
///
/// `version` starts at 1 and increments by exactly 1 on every successful
/// write to the key — it never decreases and is never reused.
#[derive(Debug, Clone)]
pub struct SecretRow {
    pub id: String,
    pub environment_id: String,
    pub key: String,
    pub encrypted_value: String,
    pub version: i64,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A secret after decryption, as returned by `SecretStore::list`.
#[derive(Debug, Clone)]
pub struct DecryptedSecret {
    pub key: String,
    pub value: String,
    pub version: i64,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

/// A plaintext key/value pair on its way into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretEntry {
    pub key: String,
    pub value: String,
}

impl SecretEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A CLI bearer token record. Only the SHA-256 hash of the raw token is
/// ever stored; the raw token is shown once at creation time.
#[derive(Debug, Clone)]
pub struct CliToken {
    pub id: String,
    pub name: String,
    pub token_hash: String,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Team role lattice used by deployments that front the store with an
/// API: owner > admin > member, compared as a total order rather than
/// by string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
    Owner,
}

impl Role {
    /// True if this role grants at least the privileges of `required`.
    pub fn at_least(self, required: Role) -> bool {
        self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Member => "member",
            Role::Admin => "admin",
            Role::Owner => "owner",
        };
        f.write_str(s)
    }
}

impl FromStr for Role {
    type Err = EnvPushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            "owner" => Ok(Role::Owner),
            other => Err(EnvPushError::Validation(format!(
                "unknown role '{other}' — expected member, admin, or owner"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ordering_is_total() {
        assert!(Role::Owner > Role::Admin);
        assert!(Role::Admin > Role::Member);
        assert!(Role::Owner > Role::Member);
    }

    #[test]
    fn role_at_least() {
        assert!(Role::Owner.at_least(Role::Admin));
        assert!(Role::Admin.at_least(Role::Admin));
        assert!(!Role::Member.at_least(Role::Admin));
    }

    #[test]
    fn role_parse_roundtrip() {
        for role in [Role::Member, Role::Admin, Role::Owner] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }
}
