//! Project rows — the scope that groups environments.

use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::Result;
use crate::model::Project;

use super::{map_constraint, new_id, now_rfc3339, parse_timestamp};

/// Insert a new project.  Slugs are unique across the database.
pub fn create(conn: &Connection, name: &str, slug: &str) -> Result<Project> {
    let id = new_id();
    let created_at = now_rfc3339();

    conn.execute(
        "INSERT INTO projects (id, name, slug, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, slug, created_at],
    )
    .map_err(|e| map_constraint(e, &format!("project slug '{slug}' already exists")))?;

    Ok(Project {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        created_at: parse_timestamp(&created_at),
    })
}

/// Look up a project by its slug.
pub fn find_by_slug(conn: &Connection, slug: &str) -> Result<Option<Project>> {
    let project = conn
        .query_row(
            "SELECT id, name, slug, created_at FROM projects WHERE slug = ?1",
            params![slug],
            row_to_project,
        )
        .optional()?;

    Ok(project)
}

/// Look up a project by id.
pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Project>> {
    let project = conn
        .query_row(
            "SELECT id, name, slug, created_at FROM projects WHERE id = ?1",
            params![id],
            row_to_project,
        )
        .optional()?;

    Ok(project)
}

/// Delete a project.  Cascades to its environments and their secrets.
pub fn delete(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    Ok(())
}

fn row_to_project(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    let created_at: String = row.get(3)?;
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        created_at: parse_timestamp(&created_at),
    })
}
