//! `evp export` — render secrets as `.env` text.
//!
//! Writes plaintext `KEY=value` lines to a file or stdout.  No quoting is
//! applied on export.

use std::fs;
use std::path::Path;

use crate::audit;
use crate::cli::{output, resolve_context, Cli};
use crate::errors::Result;
use crate::store::SecretStore;

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: Option<&Path>) -> Result<()> {
    let mut ctx = resolve_context(cli)?;
    let env_id = ctx.environment.id.clone();

    let content = {
        let store = SecretStore::new(&mut ctx.db, &ctx.master_key);
        store.export(&env_id)?
    };

    audit::record(
        &ctx.db,
        &ctx.settings.actor(),
        "secrets.export",
        "environment",
        &env_id,
        Some(&format!("{} secrets", content.lines().count())),
    );

    match output_path {
        Some(dest) => {
            fs::write(dest, &content)?;
            output::success(&format!(
                "Exported {} secrets to {}",
                content.lines().count(),
                dest.display()
            ));
        }
        None => {
            // Raw output only, so it can be piped.
            print!("{content}");
        }
    }

    Ok(())
}
