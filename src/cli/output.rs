//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::model::DecryptedSecret;
use crate::sync::{ChangeKind, DiffResult};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Mask a secret value for display: keep length hints out of the output.
pub fn mask_value(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    "\u{2022}".repeat(8)
}

/// Render a timestamp as a short relative age ("3d ago").
pub fn time_ago(ts: DateTime<Utc>) -> String {
    let delta = Utc::now().signed_duration_since(ts);

    if delta.num_seconds() < 60 {
        "just now".to_string()
    } else if delta.num_minutes() < 60 {
        format!("{}m ago", delta.num_minutes())
    } else if delta.num_hours() < 24 {
        format!("{}h ago", delta.num_hours())
    } else {
        format!("{}d ago", delta.num_days())
    }
}

/// Print a table of secrets (Key, Value, Version, Updated).
pub fn print_secrets_table(secrets: &[DecryptedSecret], reveal: bool) {
    if secrets.is_empty() {
        info("No secrets in this environment yet.");
        tip("Run `evp push` or `evp set KEY=VALUE` to add some.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Value", "Version", "Updated"]);

    for s in secrets {
        let value = if reveal {
            s.value.clone()
        } else {
            mask_value(&s.value)
        };
        table.add_row(vec![
            s.key.clone(),
            value,
            format!("v{}", s.version),
            time_ago(s.updated_at),
        ]);
    }

    println!("{table}");
}

/// Print a classified diff: one line per added/removed/changed key, then
/// a summary including the unchanged count.
pub fn print_diff(diff: &DiffResult, env_slug: &str) {
    println!(
        "\n{} local .env vs remote ({})",
        style("Diff:").bold(),
        style(env_slug).cyan()
    );
    println!();

    for (key, kind) in diff.entries() {
        match kind {
            ChangeKind::Added => {
                println!("  {} {}  (local only)", style("+").green().bold(), style(&key).green());
            }
            ChangeKind::Removed => {
                println!("  {} {}  (remote only)", style("-").red().bold(), style(&key).red());
            }
            ChangeKind::Changed => {
                println!(
                    "  {} {}  (value differs)",
                    style("~").yellow().bold(),
                    style(&key).yellow()
                );
            }
        }
    }

    println!();
    println!(
        "  {} added, {} removed, {} changed, {} unchanged",
        style(diff.added.len()).green().bold(),
        style(diff.removed.len()).red().bold(),
        style(diff.changed.len()).yellow().bold(),
        style(diff.unchanged.len()).dim()
    );
}
