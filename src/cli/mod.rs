//! CLI module — Clap argument parser, output helpers, and command
//! implementations.

pub mod commands;
pub mod gitignore;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;
use crate::crypto::MasterKey;
use crate::errors::{EnvPushError, Result};
use crate::model::{Environment, Project};
use crate::store::{environments, projects, Database};

/// envpush CLI: self-hosted secrets manager with .env sync.
#[derive(Parser)]
#[command(
    name = "evp",
    about = "Self-hosted secrets manager: push/pull .env files against an encrypted store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Environment slug (default: from .envpush.toml)
    #[arg(short, long, global = true, env = "ENVPUSH_ENV")]
    pub env: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a project with default environments
    Init {
        /// Project name (default: current directory name)
        name: Option<String>,
    },

    /// Push the local .env to the remote store (with diff + confirmation)
    Push {
        /// Local env file to push
        #[arg(short, long, default_value = ".env")]
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Pull remote secrets into the local .env (overwrites)
    Pull {
        /// Local env file to write
        #[arg(short, long, default_value = ".env")]
        file: PathBuf,

        /// Print to stdout instead of writing the file
        #[arg(long)]
        stdout: bool,
    },

    /// Compare the local .env against the remote store
    Diff {
        /// Local env file to compare
        #[arg(short, long, default_value = ".env")]
        file: PathBuf,
    },

    /// Set a single secret (KEY=VALUE)
    Set {
        /// KEY=VALUE pair
        keyvalue: String,
    },

    /// Remove a single secret
    Unset {
        /// Secret key to remove
        key: String,
    },

    /// List all secrets in the environment
    List {
        /// Show actual values instead of masked ones
        #[arg(long)]
        reveal: bool,
    },

    /// Export secrets as .env text
    Export {
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage environments (list, create, delete)
    Env {
        #[command(subcommand)]
        action: EnvAction,
    },

    /// Manage CLI bearer tokens (create, list, revoke)
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// View the audit log of store operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

/// Env subcommands for environment management.
#[derive(clap::Subcommand)]
pub enum EnvAction {
    /// List the project's environments
    List,

    /// Create a new environment
    Create {
        /// Environment slug (e.g. "preview")
        slug: String,
    },

    /// Delete an environment and all its secrets
    Delete {
        /// Environment slug to delete
        slug: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Token subcommands.
#[derive(clap::Subcommand)]
pub enum TokenAction {
    /// Mint a new bearer token (shown once)
    Create {
        /// Token name (e.g. "laptop", "ci")
        name: String,
        /// Days until expiry (default: 90)
        #[arg(long)]
        expires_days: Option<i64>,
    },

    /// List tokens
    List,

    /// Revoke a token by name
    Revoke {
        /// Token name
        name: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a secret-level command needs: config, database, master key,
/// and the resolved project + environment rows.
pub struct Context {
    pub settings: Settings,
    pub db: Database,
    pub master_key: MasterKey,
    pub project: Project,
    pub environment: Environment,
}

/// Load config from the working directory and open the database.
pub fn open_workspace() -> Result<(Settings, Database)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let db = Database::open(&settings.database_path(&cwd))?;
    Ok((settings, db))
}

/// Resolve the full context for commands that operate on one environment.
///
/// The environment slug comes from `--env` when given, otherwise from the
/// config's `default_environment`.
pub fn resolve_context(cli: &Cli) -> Result<Context> {
    let (settings, db) = open_workspace()?;
    let master_key = MasterKey::from_env()?;

    let project = projects::find_by_slug(db.conn(), &settings.project)?
        .ok_or_else(|| EnvPushError::ProjectNotFound(settings.project.clone()))?;

    let slug = cli
        .env
        .clone()
        .unwrap_or_else(|| settings.default_environment.clone());
    environments::validate_slug(&slug)?;

    let environment = environments::find_by_slug(db.conn(), &project.id, &slug)?
        .ok_or_else(|| EnvPushError::EnvironmentNotFound(slug))?;

    Ok(Context {
        settings,
        db,
        master_key,
        project,
        environment,
    })
}

/// Ask the user to confirm an action (dialoguer yes/no, default no).
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| EnvPushError::CommandFailed(format!("confirmation prompt: {e}")))
}
