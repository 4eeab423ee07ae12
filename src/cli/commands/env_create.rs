//! `evp env create` — add an environment to the project.

use crate::audit;
use crate::cli::{open_workspace, output};
use crate::errors::{EnvPushError, Result};
use crate::store::{environments, projects};

/// Execute the `env create` command.
pub fn execute(slug: &str) -> Result<()> {
    let (settings, db) = open_workspace()?;

    let project = projects::find_by_slug(db.conn(), &settings.project)?
        .ok_or_else(|| EnvPushError::ProjectNotFound(settings.project.clone()))?;

    let env = environments::create(db.conn(), &project.id, slug, slug)?;

    audit::record(
        &db,
        &settings.actor(),
        "environment.create",
        "environment",
        &env.id,
        Some(slug),
    );

    output::success(&format!("Environment '{slug}' created."));
    output::tip(&format!("Push secrets to it: evp --env {slug} push"));

    Ok(())
}
