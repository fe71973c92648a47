mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sirs_core::{Controller, SessionContext};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a server connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "sirs", &mut std::io::stdout());
            Ok(())
        }

        Command::Login => {
            let cfg = sirs_config::load_config_or_default();
            commands::session::login(&cli.global, &cfg).await
        }

        Command::Logout => {
            let cfg = sirs_config::load_config_or_default();
            commands::session::logout(&cli.global, &cfg)
        }

        // Everything else talks to the server
        cmd => {
            let cfg = sirs_config::load_config_or_default();
            let resolved = config::resolve(&cli.global, &cfg)?;

            let session = sirs_config::load_session(&resolved.profile_name)
                .map_or_else(SessionContext::new, SessionContext::with_session);
            let controller = Controller::new(resolved.client, session.clone())?;
            controller.ensure_session().await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &controller, &cli.global, resolved.page_size).await;

            persist_session(&resolved.profile_name, &session);
            result
        }
    }
}

/// Write back the (possibly refreshed) session, or drop the stored one when
/// the server forced a logout.
fn persist_session(profile_name: &str, session: &SessionContext) {
    let outcome = match session.current() {
        Some(current) => sirs_config::save_session(profile_name, &current),
        None => sirs_config::clear_session(profile_name),
    };
    if let Err(e) = outcome {
        tracing::debug!(error = %e, "session not persisted");
    }
}
