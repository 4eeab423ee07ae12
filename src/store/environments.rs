//! Environment rows — the namespaces secrets live in.
//!
//! `(project_id, slug)` is unique.  Deleting an environment cascades to
//! its secrets via the foreign key.

use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{EnvPushError, Result};
use crate::model::Environment;

use super::{map_constraint, new_id, now_rfc3339, parse_timestamp};

/// Validate that an environment slug is safe and sensible.
///
/// Allowed: lowercase letters, digits, hyphens. Must not be empty
/// or start/end with a hyphen. Max length 64 characters.
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(EnvPushError::Validation(
            "environment slug cannot be empty".into(),
        ));
    }

    if slug.len() > 64 {
        return Err(EnvPushError::Validation(
            "environment slug cannot exceed 64 characters".into(),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(EnvPushError::Validation(format!(
            "environment slug '{slug}' is invalid — only lowercase letters, digits, and hyphens are allowed"
        )));
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(EnvPushError::Validation(format!(
            "environment slug '{slug}' cannot start or end with a hyphen"
        )));
    }

    Ok(())
}

/// Insert a new environment under a project.
pub fn create(conn: &Connection, project_id: &str, name: &str, slug: &str) -> Result<Environment> {
    validate_slug(slug)?;

    let id = new_id();
    let created_at = now_rfc3339();

    conn.execute(
        "INSERT INTO environments (id, project_id, name, slug, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, project_id, name, slug, created_at],
    )
    .map_err(|e| map_constraint(e, &format!("environment '{slug}' already exists in this project")))?;

    Ok(Environment {
        id,
        project_id: project_id.to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        created_at: parse_timestamp(&created_at),
    })
}

/// Look up an environment by id.
pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Environment>> {
    let env = conn
        .query_row(
            "SELECT id, project_id, name, slug, created_at
             FROM environments WHERE id = ?1",
            params![id],
            row_to_environment,
        )
        .optional()?;

    Ok(env)
}

/// Look up an environment by `(project_id, slug)`.
pub fn find_by_slug(conn: &Connection, project_id: &str, slug: &str) -> Result<Option<Environment>> {
    let env = conn
        .query_row(
            "SELECT id, project_id, name, slug, created_at
             FROM environments WHERE project_id = ?1 AND slug = ?2",
            params![project_id, slug],
            row_to_environment,
        )
        .optional()?;

    Ok(env)
}

/// List a project's environments, ordered by slug.
pub fn list_by_project(conn: &Connection, project_id: &str) -> Result<Vec<Environment>> {
    let mut stmt = conn.prepare(
        "SELECT id, project_id, name, slug, created_at
         FROM environments WHERE project_id = ?1 ORDER BY slug",
    )?;

    let rows = stmt.query_map(params![project_id], row_to_environment)?;

    let mut envs = Vec::new();
    for row in rows {
        envs.push(row?);
    }
    Ok(envs)
}

/// Delete an environment.  Its secrets go with it (cascade).
pub fn delete(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM environments WHERE id = ?1", params![id])?;
    Ok(())
}

fn row_to_environment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Environment> {
    let created_at: String = row.get(4)?;
    Ok(Environment {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        created_at: parse_timestamp(&created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        assert!(validate_slug("development").is_ok());
        assert!(validate_slug("staging").is_ok());
        assert!(validate_slug("us-east-1").is_ok());
        assert!(validate_slug("v2").is_ok());
    }

    #[test]
    fn rejects_bad_slugs() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Prod").is_err());
        assert!(validate_slug("dev test").is_err());
        assert!(validate_slug("dev_test").is_err());
        assert!(validate_slug("-dev").is_err());
        assert!(validate_slug("dev-").is_err());
        assert!(validate_slug(&"a".repeat(65)).is_err());
    }
}
