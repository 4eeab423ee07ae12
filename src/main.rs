use clap::Parser;
use envpush::cli::{Cli, Commands, EnvAction, TokenAction};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { ref name } => {
            envpush::cli::commands::init::execute(name.as_deref())
        }
        Commands::Push { ref file, yes } => envpush::cli::commands::push::execute(&cli, file, yes),
        Commands::Pull { ref file, stdout } => {
            envpush::cli::commands::pull::execute(&cli, file, stdout)
        }
        Commands::Diff { ref file } => envpush::cli::commands::diff::execute(&cli, file),
        Commands::Set { ref keyvalue } => envpush::cli::commands::set::execute(&cli, keyvalue),
        Commands::Unset { ref key } => envpush::cli::commands::unset::execute(&cli, key),
        Commands::List { reveal } => envpush::cli::commands::list::execute(&cli, reveal),
        Commands::Export { ref output } => {
            envpush::cli::commands::export::execute(&cli, output.as_deref())
        }
        Commands::Env { ref action } => match action {
            EnvAction::List => envpush::cli::commands::env_list::execute(),
            EnvAction::Create { ref slug } => envpush::cli::commands::env_create::execute(slug),
            EnvAction::Delete { ref slug, force } => {
                envpush::cli::commands::env_delete::execute(slug, *force)
            }
        },
        Commands::Token { ref action } => match action {
            TokenAction::Create {
                ref name,
                expires_days,
            } => envpush::cli::commands::token::execute_create(name, *expires_days),
            TokenAction::List => envpush::cli::commands::token::execute_list(),
            TokenAction::Revoke { ref name } => {
                envpush::cli::commands::token::execute_revoke(name)
            }
        },
        Commands::Audit { last, ref since } => {
            envpush::cli::commands::audit_cmd::execute(last, since.as_deref())
        }
        Commands::Completions { ref shell } => envpush::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        envpush::cli::output::error(&e.to_string());
        if matches!(e, envpush::errors::EnvPushError::ProjectNotFound(_)) {
            envpush::cli::output::tip("Run `evp init` to create a project.");
        }
        std::process::exit(1);
    }
}
