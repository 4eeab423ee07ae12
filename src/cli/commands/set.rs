//! `evp set KEY=VALUE` — add or replace one secret.
//!
//! Implemented as a degenerate full-replace: read the full decrypted
//! set, swap one key in memory, and write the whole set back.  The
//! store therefore bumps every key's version, not just the target — a
//! known cost of the full-replace write path.

use std::collections::BTreeMap;

use crate::audit;
use crate::cli::{output, resolve_context, Cli};
use crate::errors::{EnvPushError, Result};
use crate::model::SecretEntry;
use crate::store::SecretStore;

/// Execute the `set` command.
pub fn execute(cli: &Cli, keyvalue: &str) -> Result<()> {
    let Some((key, value)) = keyvalue.split_once('=') else {
        return Err(EnvPushError::Validation(
            "expected KEY=VALUE — usage: evp set KEY=VALUE".into(),
        ));
    };

    let mut ctx = resolve_context(cli)?;
    let env_id = ctx.environment.id.clone();
    let actor = ctx.settings.actor();

    let existed = {
        let mut store = SecretStore::new(&mut ctx.db, &ctx.master_key);

        let mut vars: BTreeMap<String, String> =
            store.snapshot(&env_id)?.into_iter().collect();
        let existed = vars
            .insert(key.to_string(), value.to_string())
            .is_some();

        let incoming: Vec<SecretEntry> = vars
            .into_iter()
            .map(|(key, value)| SecretEntry { key, value })
            .collect();
        store.upsert_many(&env_id, &incoming, &actor)?;

        existed
    };

    audit::record(
        &ctx.db,
        &actor,
        "secrets.set",
        "secret",
        &format!("{env_id}/{key}"),
        Some(if existed { "updated" } else { "added" }),
    );

    output::success(&format!(
        "Set {key} in {} ({})",
        ctx.environment.slug,
        if existed { "updated" } else { "added" }
    ));

    Ok(())
}
