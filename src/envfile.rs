//! The flat `KEY=VALUE` text codec used for local `.env` files.
//!
//! Parsing is deliberately permissive: malformed lines are skipped, not
//! diagnosed.  Both functions are pure — file I/O lives with the CLI
//! callers.
//!
//! Known limitation: export/serialize applies no quoting, so values
//! containing `=` survive a round-trip but values containing newlines do
//! not.

use std::collections::{BTreeMap, HashMap};

/// Parse a single `.env` line into a (key, value) pair.
///
/// Returns `None` for blank lines, comments, and lines without `=`.
/// Handles: `export` prefix, double/single quotes, values with `=`.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();

    // Skip empty lines and comments.
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    // Strip optional `export ` prefix.
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);

    // Split on the first '=' to get KEY and VALUE.
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    // Strip exactly one layer of matching surrounding quotes.
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);

    if key.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse `.env` file content into a key-value map.
///
/// Later duplicate keys overwrite earlier ones.
pub fn parse(content: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    for line in content.lines() {
        if let Some((key, value)) = parse_line(line) {
            vars.insert(key.to_string(), value.to_string());
        }
    }

    vars
}

/// Serialize key-value pairs back to `.env` format, one `KEY=VALUE` line
/// per entry with a trailing newline.  Empty input yields an empty string.
///
/// Takes a `BTreeMap` so the output is sorted by key.
pub fn serialize(vars: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in vars {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_key_value() {
        assert_eq!(parse_line("KEY=value"), Some(("KEY", "value")));
    }

    #[test]
    fn parse_export_prefix() {
        assert_eq!(
            parse_line("export DATABASE_URL=postgres://localhost/db"),
            Some(("DATABASE_URL", "postgres://localhost/db"))
        );
    }

    #[test]
    fn parse_value_with_equals() {
        assert_eq!(parse_line("KEY=val=ue"), Some(("KEY", "val=ue")));
    }

    #[test]
    fn parse_double_quoted_value() {
        assert_eq!(parse_line(r#"KEY="hello world""#), Some(("KEY", "hello world")));
    }

    #[test]
    fn parse_single_quoted_value() {
        assert_eq!(parse_line("KEY='hello world'"), Some(("KEY", "hello world")));
    }

    #[test]
    fn parse_strips_only_one_quote_layer() {
        assert_eq!(parse_line(r#"KEY=""quoted"""#), Some(("KEY", r#""quoted""#)));
    }

    #[test]
    fn parse_empty_value() {
        assert_eq!(parse_line("KEY="), Some(("KEY", "")));
    }

    #[test]
    fn parse_skips_comments_and_blanks() {
        assert_eq!(parse_line("# this is a comment"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn parse_skips_lines_without_equals() {
        assert_eq!(parse_line("NOEQUALS"), None);
    }

    #[test]
    fn parse_skips_empty_key() {
        assert_eq!(parse_line("=value"), None);
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(parse_line("  KEY  =  value  "), Some(("KEY", "value")));
    }

    #[test]
    fn parse_last_duplicate_wins() {
        let vars = parse("A=first\nA=second\n");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["A"], "second");
    }

    #[test]
    fn serialize_sorted_with_trailing_newline() {
        let mut vars = BTreeMap::new();
        vars.insert("B".to_string(), "2".to_string());
        vars.insert("A".to_string(), "1".to_string());
        assert_eq!(serialize(&vars), "A=1\nB=2\n");
    }

    #[test]
    fn serialize_empty_map_is_empty_string() {
        assert_eq!(serialize(&BTreeMap::new()), "");
    }

    #[test]
    fn codec_roundtrip_for_benign_values() {
        let mut vars = BTreeMap::new();
        vars.insert("DB_URL".to_string(), "postgres://localhost/db".to_string());
        vars.insert("PORT".to_string(), "8787".to_string());
        vars.insert("EMPTY".to_string(), String::new());

        let parsed = parse(&serialize(&vars));
        let parsed: BTreeMap<_, _> = parsed.into_iter().collect();
        assert_eq!(parsed, vars);
    }
}
