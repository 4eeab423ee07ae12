//! `evp env delete` — delete an environment and all its secrets.

use crate::audit;
use crate::cli::{confirm, open_workspace, output};
use crate::errors::{EnvPushError, Result};
use crate::store::{environments, projects};

/// Execute the `env delete` command.
pub fn execute(slug: &str, force: bool) -> Result<()> {
    let (settings, db) = open_workspace()?;

    let project = projects::find_by_slug(db.conn(), &settings.project)?
        .ok_or_else(|| EnvPushError::ProjectNotFound(settings.project.clone()))?;

    let env = environments::find_by_slug(db.conn(), &project.id, slug)?
        .ok_or_else(|| EnvPushError::EnvironmentNotFound(slug.to_string()))?;

    if !force
        && !confirm(&format!(
            "Delete environment '{slug}' and ALL of its secrets?"
        ))?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    // Secrets go with the environment (foreign key cascade).
    environments::delete(db.conn(), &env.id)?;

    audit::record(
        &db,
        &settings.actor(),
        "environment.delete",
        "environment",
        &env.id,
        Some(slug),
    );

    output::success(&format!("Environment '{slug}' deleted."));

    Ok(())
}
