//! Command executor for dispatching CLI commands
//!
//! Main entry point once arguments are parsed: loads configuration and
//! logging as the command needs them, then runs its handler.

use super::handlers::{SendCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use super::{init_client_logger, init_logger_from_settings, load_and_merge_config};

/// Execute the parsed command; no subcommand means `serve`
///
/// # Errors
/// Returns configuration, logger, or handler failures
pub async fn execute_command(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Send {
            server,
            tag,
            sync,
            level,
        }) => {
            init_client_logger(&cli)?;
            SendCommandHandler::new(server, tag.clone(), *sync, *level)
                .execute()
                .await
        }
        Some(Commands::Serve { dry_run, .. }) => serve(&cli, *dry_run).await,
        None => serve(&cli, false).await,
    }
}

async fn serve(cli: &Cli, dry_run: bool) -> anyhow::Result<()> {
    let settings = load_and_merge_config(cli)?;

    if !dry_run {
        init_logger_from_settings(&settings)?;
    }

    ServeCommandHandler::new(settings).execute(dry_run).await
}
