//! `evp unset KEY` — remove one secret.
//!
//! Like `set`, this is a degenerate full-replace write: the remaining
//! set is pushed back whole, so every surviving key's version bumps.

use std::collections::BTreeMap;

use crate::audit;
use crate::cli::{output, resolve_context, Cli};
use crate::errors::{EnvPushError, Result};
use crate::model::SecretEntry;
use crate::store::SecretStore;

/// Execute the `unset` command.
pub fn execute(cli: &Cli, key: &str) -> Result<()> {
    let mut ctx = resolve_context(cli)?;
    let env_id = ctx.environment.id.clone();
    let actor = ctx.settings.actor();

    {
        let mut store = SecretStore::new(&mut ctx.db, &ctx.master_key);

        let mut vars: BTreeMap<String, String> =
            store.snapshot(&env_id)?.into_iter().collect();

        if vars.remove(key).is_none() {
            return Err(EnvPushError::SecretNotFound(key.to_string()));
        }

        let incoming: Vec<SecretEntry> = vars
            .into_iter()
            .map(|(key, value)| SecretEntry { key, value })
            .collect();
        store.upsert_many(&env_id, &incoming, &actor)?;
    }

    audit::record(
        &ctx.db,
        &actor,
        "secrets.unset",
        "secret",
        &format!("{env_id}/{key}"),
        None,
    );

    output::success(&format!("Removed {key} from {}", ctx.environment.slug));

    Ok(())
}
