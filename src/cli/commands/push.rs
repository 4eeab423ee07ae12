//! `evp push` — push the local `.env` to the remote store.
//!
//! Computes the diff first; a nonempty diff requires confirmation (or
//! `--yes`).  On confirmation the *complete* local map is sent, because
//! the store's upsert is full-replace.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::audit;
use crate::cli::{confirm, output, resolve_context, Cli};
use crate::envfile;
use crate::errors::{EnvPushError, Result};
use crate::model::SecretEntry;
use crate::store::SecretStore;
use crate::sync::compute_diff;

/// Read the local env file, turning only a missing file into the
/// friendly "no .env file" message; other I/O failures (permissions,
/// unreadable paths) propagate as-is.
pub(crate) fn read_env_file(file: &Path) -> Result<String> {
    fs::read_to_string(file).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => EnvPushError::CommandFailed(format!(
            "no {} file found in current directory",
            file.display()
        )),
        _ => EnvPushError::Io(e),
    })
}

/// Execute the `push` command.
pub fn execute(cli: &Cli, file: &Path, yes: bool) -> Result<()> {
    let mut ctx = resolve_context(cli)?;

    let content = read_env_file(file)?;
    let local = envfile::parse(&content);

    let env_id = ctx.environment.id.clone();
    let env_slug = ctx.environment.slug.clone();
    let actor = ctx.settings.actor();

    let diff = {
        let mut store = SecretStore::new(&mut ctx.db, &ctx.master_key);
        let remote = store.snapshot(&env_id)?;

        let diff = compute_diff(&local, &remote);
        if !diff.has_changes() {
            output::success("Already in sync! No changes to push.");
            return Ok(());
        }

        output::print_diff(&diff, &env_slug);

        if !yes && !confirm(&format!("Push these changes to {env_slug}?"))? {
            output::info("Cancelled.");
            return Ok(());
        }

        // Full local set, sorted for stable write order.
        let incoming: Vec<SecretEntry> = local
            .into_iter()
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .map(|(key, value)| SecretEntry { key, value })
            .collect();

        store.upsert_many(&env_id, &incoming, &actor)?;
        diff
    };

    audit::record(
        &ctx.db,
        &actor,
        "secrets.push",
        "environment",
        &env_id,
        Some(&format!("{} changes", diff.change_count())),
    );

    output::success(&format!(
        "{} changes pushed to {env_slug}",
        diff.change_count()
    ));

    Ok(())
}
