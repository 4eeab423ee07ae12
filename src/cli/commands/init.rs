//! `evp init` — set up a project with its default environments.
//!
//! Creates `.envpush.toml`, the database, the project row, and the three
//! default environments.  Safe to re-run: existing rows are kept.

use crate::audit;
use crate::cli::gitignore::patch_gitignore;
use crate::cli::output;
use crate::config::Settings;
use crate::errors::Result;
use crate::store::{environments, projects, Database};

/// Environments created for every new project.
const DEFAULT_ENVIRONMENTS: [&str; 3] = ["development", "staging", "production"];

/// Execute the `init` command.
pub fn execute(name: Option<&str>) -> Result<()> {
    let cwd = std::env::current_dir()?;

    let project_name = match name {
        Some(n) => n.to_string(),
        None => cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "default".to_string()),
    };
    let slug = slugify(&project_name);

    // Write (or update) the project config.
    let mut settings = Settings::load(&cwd)?;
    settings.project = slug.clone();
    settings.save(&cwd)?;

    let db = Database::open(&settings.database_path(&cwd))?;

    let project = match projects::find_by_slug(db.conn(), &slug)? {
        Some(existing) => {
            output::info(&format!("Project '{slug}' already exists."));
            existing
        }
        None => projects::create(db.conn(), &project_name, &slug)?,
    };

    let mut created = 0;
    for env_slug in DEFAULT_ENVIRONMENTS {
        if environments::find_by_slug(db.conn(), &project.id, env_slug)?.is_none() {
            environments::create(db.conn(), &project.id, env_slug, env_slug)?;
            created += 1;
        }
    }

    patch_gitignore(&cwd, &[".envpush/", ".env"]);

    audit::record(
        &db,
        &settings.actor(),
        "project.init",
        "project",
        &project.id,
        Some(&format!("{created} environments created")),
    );

    output::success(&format!(
        "Project '{}' ready with {} environments.",
        slug,
        DEFAULT_ENVIRONMENTS.len()
    ));
    output::tip("Push your first secrets: evp push");

    Ok(())
}

/// Turn an arbitrary project name into a slug: lowercase, runs of
/// non-alphanumerics collapsed to single hyphens.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "default".to_string()
    } else {
        slug
    }
}
