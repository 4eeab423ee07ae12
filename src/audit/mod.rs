//! Audit log — operation history stored alongside the secrets.
//!
//! Records who did what to which resource (`secrets.push`,
//! `environment.delete`, ...).  Designed for graceful degradation:
//! writing an audit row never fails the parent operation.

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::errors::{EnvPushError, Result};
use crate::store::{parse_timestamp, Database};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub details: Option<String>,
}

/// Record an operation.  Fire-and-forget — errors are silently ignored.
pub fn record(
    db: &Database,
    actor: &str,
    action: &str,
    resource_type: &str,
    resource_id: &str,
    details: Option<&str>,
) {
    let now = Utc::now().to_rfc3339();
    let _ = db.conn().execute(
        "INSERT INTO audit_log (timestamp, actor, action, resource_type, resource_id, details)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![now, actor, action, resource_type, resource_id, details],
    );
}

/// Query recent audit entries, most recent first.
///
/// - `limit`: maximum number of entries to return.
/// - `since`: if provided, only entries newer than this timestamp.
pub fn query(db: &Database, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
    let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
    let conn = db.conn();

    let (sql, params): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match since {
        Some(ref ts) => (
            "SELECT id, timestamp, actor, action, resource_type, resource_id, details
             FROM audit_log
             WHERE timestamp >= ?1
             ORDER BY id DESC
             LIMIT ?2",
            vec![
                Box::new(ts.to_rfc3339()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit_i64),
            ],
        ),
        None => (
            "SELECT id, timestamp, actor, action, resource_type, resource_id, details
             FROM audit_log
             ORDER BY id DESC
             LIMIT ?1",
            vec![Box::new(limit_i64) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| EnvPushError::CommandFailed(format!("audit query prepare: {e}")))?;

    let params_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| &**p).collect();

    let rows = stmt
        .query_map(params_refs.as_slice(), |row| {
            let ts_str: String = row.get(1)?;
            let timestamp = parse_timestamp(&ts_str);

            Ok(AuditEntry {
                id: row.get(0)?,
                timestamp,
                actor: row.get(2)?,
                action: row.get(3)?,
                resource_type: row.get(4)?,
                resource_id: row.get(5)?,
                details: row.get(6)?,
            })
        })
        .map_err(|e| EnvPushError::CommandFailed(format!("audit query exec: {e}")))?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row.map_err(|e| EnvPushError::CommandFailed(format!("audit row: {e}")))?);
    }

    Ok(entries)
}
