//! `evp diff` — compare the local `.env` against the remote store.
//!
//! Pure report: nothing is written on either side.

use std::path::Path;

use crate::cli::{output, resolve_context, Cli};
use crate::envfile;
use crate::errors::Result;
use crate::store::SecretStore;
use crate::sync::compute_diff;

use super::push::read_env_file;

/// Execute the `diff` command.
pub fn execute(cli: &Cli, file: &Path) -> Result<()> {
    let mut ctx = resolve_context(cli)?;

    let content = read_env_file(file)?;
    let local = envfile::parse(&content);

    let env_id = ctx.environment.id.clone();
    let remote = {
        let store = SecretStore::new(&mut ctx.db, &ctx.master_key);
        store.snapshot(&env_id)?
    };

    let diff = compute_diff(&local, &remote);
    output::print_diff(&diff, &ctx.environment.slug);

    println!();
    if diff.has_changes() {
        output::tip("No action taken. Use `evp push` to sync.");
    } else {
        output::success("In sync! No differences.");
    }

    Ok(())
}
