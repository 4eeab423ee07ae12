//! Project-level configuration, loaded from `.envpush.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{EnvPushError, Result};

/// Settings that link a working directory to a project in the store.
///
/// Every field has a sensible default so envpush works out-of-the-box
/// without any config file at all.  The master key is deliberately not a
/// setting — it comes only from `ENVPUSH_MASTER_KEY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Slug of the project this directory belongs to.
    #[serde(default = "default_project")]
    pub project: String,

    /// Which environment to use when none is specified.
    #[serde(default = "default_environment")]
    pub default_environment: String,

    /// Path to the SQLite database file (relative paths resolve against
    /// the project root).
    #[serde(default = "default_database")]
    pub database: String,

    /// Name recorded as `updated_by` on writes.  Falls back to `$USER`.
    #[serde(default)]
    pub user: Option<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_project() -> String {
    "default".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_database() -> String {
    ".envpush/envpush.db".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            project: default_project(),
            default_environment: default_environment(),
            database: default_database(),
            user: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".envpush.toml";

    /// Load settings from `<project_dir>/.envpush.toml`.
    ///
    /// If the file does not exist, defaults are returned.  If the file
    /// exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            EnvPushError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Write settings to `<project_dir>/.envpush.toml`.
    pub fn save(&self, project_dir: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| EnvPushError::SerializationError(e.to_string()))?;
        std::fs::write(project_dir.join(Self::FILE_NAME), contents)?;
        Ok(())
    }

    /// Resolve the database path against the project root.
    pub fn database_path(&self, project_dir: &Path) -> PathBuf {
        let path = Path::new(&self.database);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_dir.join(path)
        }
    }

    /// The name to record as `updated_by` on writes.
    pub fn actor(&self) -> String {
        self.user
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path()).unwrap();

        assert_eq!(settings.project, "default");
        assert_eq!(settings.default_environment, "development");
        assert_eq!(settings.database, ".envpush/envpush.db");
    }

    #[test]
    fn load_save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            project: "acme-api".to_string(),
            default_environment: "staging".to_string(),
            database: "/var/lib/envpush/envpush.db".to_string(),
            user: Some("alice".to_string()),
        };

        settings.save(dir.path()).unwrap();
        let loaded = Settings::load(dir.path()).unwrap();

        assert_eq!(loaded.project, "acme-api");
        assert_eq!(loaded.default_environment, "staging");
        assert_eq!(loaded.user.as_deref(), Some("alice"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(Settings::FILE_NAME),
            "project = \"acme-api\"\n",
        )
        .unwrap();

        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.project, "acme-api");
        assert_eq!(settings.default_environment, "development");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(Settings::FILE_NAME), "project = [broken").unwrap();

        assert!(Settings::load(dir.path()).is_err());
    }

    #[test]
    fn database_path_resolution() {
        let settings = Settings::default();
        let resolved = settings.database_path(Path::new("/srv/app"));
        assert_eq!(resolved, Path::new("/srv/app/.envpush/envpush.db"));

        let absolute = Settings {
            database: "/data/envpush.db".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            absolute.database_path(Path::new("/srv/app")),
            Path::new("/data/envpush.db")
        );
    }
}
