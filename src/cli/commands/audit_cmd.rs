//! `evp audit` — display the audit log.
//!
//! Usage:
//!   evp audit               # show last 50 entries
//!   evp audit --last 20     # show last 20
//!   evp audit --since 7d    # entries from the last 7 days

use chrono::Utc;
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::{self, AuditEntry};
use crate::cli::{open_workspace, output};
use crate::errors::{EnvPushError, Result};

/// Execute the `audit` command.
pub fn execute(last: usize, since: Option<&str>) -> Result<()> {
    let (_settings, db) = open_workspace()?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = audit::query(&db, last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit) = if let Some(s) = input.strip_suffix('d') {
        (s, 'd')
    } else if let Some(s) = input.strip_suffix('h') {
        (s, 'h')
    } else if let Some(s) = input.strip_suffix('m') {
        (s, 'm')
    } else {
        return Err(EnvPushError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        )));
    };

    let num: i64 = num_str.parse().map_err(|_| {
        EnvPushError::CommandFailed(format!(
            "invalid duration '{input}' — number part is not valid"
        ))
    })?;

    let duration = match unit {
        'd' => chrono::Duration::days(num),
        'h' => chrono::Duration::hours(num),
        'm' => chrono::Duration::minutes(num),
        _ => unreachable!(),
    };

    Ok(Utc::now() - duration)
}

/// Print audit entries in a formatted table.
fn print_audit_table(entries: &[AuditEntry]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Actor", "Action", "Resource", "Details"]);

    for entry in entries {
        let time = entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let resource = format!("{} {}", entry.resource_type, short_id(&entry.resource_id));
        let details = entry.details.as_deref().unwrap_or("-");

        table.add_row(vec![
            time,
            entry.actor.clone(),
            colorize_action(&entry.action),
            resource,
            details.to_string(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Abbreviate long hex row ids for table display.
fn short_id(id: &str) -> &str {
    if id.len() > 12 && id.bytes().all(|b| b.is_ascii_hexdigit()) {
        &id[..12]
    } else {
        id
    }
}

/// Colorize action names for display.
fn colorize_action(action: &str) -> String {
    match action {
        "project.init" | "environment.create" | "token.create" => {
            style(action).green().to_string()
        }
        "secrets.push" | "secrets.set" => style(action).blue().to_string(),
        "secrets.unset" | "environment.delete" | "token.revoke" => {
            style(action).red().to_string()
        }
        "secrets.export" | "secrets.pull" => style(action).cyan().to_string(),
        _ => action.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_units() {
        let dt = parse_duration("7d").unwrap();
        assert!(((Utc::now() - dt).num_days() - 7).abs() <= 1);

        let dt = parse_duration("24h").unwrap();
        assert!(((Utc::now() - dt).num_hours() - 24).abs() <= 1);

        let dt = parse_duration("30m").unwrap();
        assert!(((Utc::now() - dt).num_minutes() - 30).abs() <= 1);
    }

    #[test]
    fn short_id_abbreviates_hex_only() {
        assert_eq!(short_id("0123456789abcdef0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("ci"), "ci");
        assert_eq!(short_id("env-1/SOME_KEY"), "env-1/SOME_KEY");
    }

    #[test]
    fn parse_duration_invalid() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("7x").is_err());
        assert!(parse_duration("d").is_err());
    }
}
