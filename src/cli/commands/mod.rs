//! Command implementations, one module per subcommand.

pub mod audit_cmd;
pub mod completions;
pub mod diff;
pub mod env_create;
pub mod env_delete;
pub mod env_list;
pub mod export;
pub mod init;
pub mod list;
pub mod pull;
pub mod push;
pub mod set;
pub mod token;
pub mod unset;
