//! `evp list` — list the environment's secrets.

use console::style;

use crate::cli::{output, resolve_context, Cli};
use crate::errors::Result;
use crate::store::SecretStore;

/// Execute the `list` command.
pub fn execute(cli: &Cli, reveal: bool) -> Result<()> {
    let mut ctx = resolve_context(cli)?;
    let env_id = ctx.environment.id.clone();

    let secrets = {
        let store = SecretStore::new(&mut ctx.db, &ctx.master_key);
        store.list(&env_id)?
    };

    println!(
        "\nEnvironment: {} ({})\n",
        style(&ctx.environment.slug).bold(),
        ctx.project.name
    );

    output::print_secrets_table(&secrets, reveal);

    if !secrets.is_empty() {
        println!("\n  {} secrets total\n", secrets.len());
    }

    Ok(())
}
