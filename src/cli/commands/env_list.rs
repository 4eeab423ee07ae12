//! `evp env list` — list the project's environments.

use console::style;

use crate::cli::{open_workspace, output};
use crate::errors::{EnvPushError, Result};
use crate::store::{environments, projects};

/// Execute the `env list` command.
pub fn execute() -> Result<()> {
    let (settings, db) = open_workspace()?;

    let project = projects::find_by_slug(db.conn(), &settings.project)?
        .ok_or_else(|| EnvPushError::ProjectNotFound(settings.project.clone()))?;

    let envs = environments::list_by_project(db.conn(), &project.id)?;

    if envs.is_empty() {
        output::info("No environments yet.");
        output::tip("Create one: evp env create <slug>");
        return Ok(());
    }

    println!("\nEnvironments for {}:\n", style(&project.name).bold());
    for env in &envs {
        let marker = if env.slug == settings.default_environment {
            style(" (default)").dim().to_string()
        } else {
            String::new()
        };
        println!(
            "  {}{}  created {}",
            style(&env.slug).cyan(),
            marker,
            env.created_at.format("%Y-%m-%d")
        );
    }
    println!();

    Ok(())
}
