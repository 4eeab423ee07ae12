//! `.gitignore` patching, used by `init` to keep the local database and
//! plaintext `.env` out of version control.

use std::fs;
use std::path::Path;

use crate::cli::output;

/// Append any of `entries` missing from `.gitignore`, creating the file
/// if needed. Write errors are ignored — the ignore file is a
/// convenience, not a requirement.
pub fn patch_gitignore(project_dir: &Path, entries: &[&str]) {
    let gitignore_path = project_dir.join(".gitignore");
    let existing = fs::read_to_string(&gitignore_path).unwrap_or_default();

    let missing: Vec<&str> = entries
        .iter()
        .copied()
        .filter(|entry| !existing.lines().any(|line| line.trim() == *entry))
        .collect();

    if missing.is_empty() {
        return;
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    for entry in &missing {
        updated.push_str(entry);
        updated.push('\n');
    }

    if fs::write(&gitignore_path, updated).is_ok() {
        output::info(&format!("Added {} to .gitignore", missing.join(", ")));
    }
}
