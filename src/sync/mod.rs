//! Reconciliation between a local `.env` snapshot and the remote store.
//!
//! `compute_diff` classifies every key in the union of the two maps into
//! exactly one of added/removed/changed/unchanged.  It works on plaintext
//! maps only — callers decrypt before diffing, and the engine never
//! touches the store.
//!
//! Consumers:
//! - `diff`  — pure report, no mutation.
//! - `push`  — if the diff is nonempty, the caller confirms and then
//!   sends the *complete* local map to `upsert_many` (full-replace).
//! - `pull`  — no diff at all; the local file is overwritten with the
//!   store's export output.

use std::collections::{BTreeSet, HashMap};

/// How a single key differs between local and remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Present locally, absent remotely.
    Added,
    /// Absent locally, present remotely.
    Removed,
    /// Present on both sides with different values.
    Changed,
}

/// Outcome of comparing a local snapshot against the remote store.
///
/// Each bucket is sorted lexicographically by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
    pub unchanged: Vec<String>,
}

impl DiffResult {
    /// True if pushing would alter the remote store.
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty())
    }

    /// Number of keys that would be created, deleted, or rewritten.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    /// Ordered (key, kind) pairs for user-facing output.
    ///
    /// Unchanged keys are counted via `unchanged.len()`, not listed.
    pub fn entries(&self) -> Vec<(String, ChangeKind)> {
        let mut entries: Vec<(String, ChangeKind)> = Vec::with_capacity(self.change_count());
        entries.extend(self.added.iter().map(|k| (k.clone(), ChangeKind::Added)));
        entries.extend(self.removed.iter().map(|k| (k.clone(), ChangeKind::Removed)));
        entries.extend(self.changed.iter().map(|k| (k.clone(), ChangeKind::Changed)));
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

/// Classify every key in `keys(local) ∪ keys(remote)`.
pub fn compute_diff(
    local: &HashMap<String, String>,
    remote: &HashMap<String, String>,
) -> DiffResult {
    let local_keys: BTreeSet<&String> = local.keys().collect();
    let remote_keys: BTreeSet<&String> = remote.keys().collect();

    // Keys only in local = added (already sorted by BTreeSet).
    let added: Vec<String> = local_keys
        .difference(&remote_keys)
        .map(|k| (*k).clone())
        .collect();

    // Keys only in remote = removed (already sorted by BTreeSet).
    let removed: Vec<String> = remote_keys
        .difference(&local_keys)
        .map(|k| (*k).clone())
        .collect();

    // Keys on both sides — partition into changed vs unchanged.
    let (changed, unchanged): (Vec<String>, Vec<String>) = local_keys
        .intersection(&remote_keys)
        .map(|k| (*k).clone())
        .partition(|key| local[key] != remote[key]);

    DiffResult {
        added,
        removed,
        changed,
        unchanged,
    }
}
