//! `evp pull` — overwrite the local `.env` with the remote store.
//!
//! No diff is computed: pull is an unconditional overwrite of the local
//! file with the store's export output.

use std::fs;
use std::path::Path;

use crate::audit;
use crate::cli::{output, resolve_context, Cli};
use crate::errors::Result;
use crate::store::SecretStore;

/// Execute the `pull` command.
pub fn execute(cli: &Cli, file: &Path, stdout: bool) -> Result<()> {
    let mut ctx = resolve_context(cli)?;

    let env_id = ctx.environment.id.clone();
    let env_slug = ctx.environment.slug.clone();

    let content = {
        let store = SecretStore::new(&mut ctx.db, &ctx.master_key);
        store.export(&env_id)?
    };

    if stdout {
        print!("{content}");
        return Ok(());
    }

    fs::write(file, &content)?;

    audit::record(
        &ctx.db,
        &ctx.settings.actor(),
        "secrets.pull",
        "environment",
        &env_id,
        None,
    );

    let count = content.lines().count();
    output::success(&format!(
        "{count} secrets -> {} ({env_slug})",
        file.display()
    ));

    Ok(())
}
