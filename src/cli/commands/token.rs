//! `evp token` — manage CLI bearer tokens.
//!
//! The raw token is printed exactly once at creation; only its hash is
//! stored, so there is no way to display it again.

use console::style;

use crate::audit;
use crate::cli::{open_workspace, output};
use crate::errors::Result;
use crate::store::TokenStore;

/// Execute the `token create` command.
pub fn execute_create(name: &str, expires_days: Option<i64>) -> Result<()> {
    let (settings, db) = open_workspace()?;

    let (raw, record) = TokenStore::new(&db).create(name, expires_days)?;

    audit::record(
        &db,
        &settings.actor(),
        "token.create",
        "token",
        &record.id,
        Some(name),
    );

    output::success(&format!("Token '{name}' created."));
    println!("\n  {}\n", style(&raw).bold());
    output::warning("This token will not be shown again — store it now.");
    println!(
        "  Expires: {}",
        record.expires_at.format("%Y-%m-%d %H:%M UTC")
    );

    Ok(())
}

/// Execute the `token list` command.
pub fn execute_list() -> Result<()> {
    let (_settings, db) = open_workspace()?;

    let tokens = TokenStore::new(&db).list()?;

    if tokens.is_empty() {
        output::info("No tokens yet.");
        output::tip("Create one: evp token create <name>");
        return Ok(());
    }

    println!();
    for token in &tokens {
        let last_used = token
            .last_used_at
            .map_or_else(|| "never used".to_string(), output::time_ago);
        println!(
            "  {}  expires {}  ({last_used})",
            style(&token.name).cyan(),
            token.expires_at.format("%Y-%m-%d")
        );
    }
    println!();

    Ok(())
}

/// Execute the `token revoke` command.
pub fn execute_revoke(name: &str) -> Result<()> {
    let (settings, db) = open_workspace()?;

    TokenStore::new(&db).revoke(name)?;

    audit::record(&db, &settings.actor(), "token.revoke", "token", name, None);

    output::success(&format!("Token '{name}' revoked."));

    Ok(())
}
