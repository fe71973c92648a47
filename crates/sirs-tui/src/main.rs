//! `sirs-tui` — terminal dashboard for the SIRS product catalog.
//!
//! Built on [ratatui](https://ratatui.rs). The product table is driven by
//! `sirs-core`'s view-state controller: search, stock tabs, sorting, paging,
//! row selection, saved views and bulk delete all run locally over the last
//! fetched snapshot.
//!
//! Logs go to a file (default under the platform data dir) so the terminal
//! is never corrupted. A background data bridge refetches on demand and
//! forwards snapshot and fetch-status changes into the action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sirs_config::Profile;
use sirs_core::{Controller, SessionContext};

use crate::app::App;

/// Terminal dashboard for the SIRS product catalog.
#[derive(Parser, Debug)]
#[command(name = "sirs-tui", version, about)]
struct Cli {
    /// Profile name from the config file
    #[arg(short, long, env = "SIRS_PROFILE")]
    profile: Option<String>,

    /// Backend base URL (overrides the profile)
    #[arg(short = 'u', long, env = "SIRS_URL")]
    url: Option<String>,

    /// Username (overrides the profile)
    #[arg(long, env = "SIRS_USERNAME", hide_env = true)]
    username: Option<String>,

    /// Log file path (defaults to sirs-tui.log in the data dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. Returns a guard that must live as long as the app
/// so buffered lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sirs_tui={log_level},sirs_core={log_level},sirs_api={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| sirs_config::log_dir().join("sirs-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("sirs-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Connection settings resolved from the config file plus flag overrides.
struct Connection {
    profile_name: String,
    controller: Controller,
    page_size: usize,
}

fn connect(cli: &Cli) -> Result<Connection> {
    let cfg = sirs_config::load_config_or_default();
    let profile_name = cfg.profile_name(cli.profile.as_deref());

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if cli.url.is_some() => Profile::default(),
        None => {
            return Err(eyre!(
                "no profile '{profile_name}' in {}; run `sirs config init` or pass --url",
                sirs_config::config_path().display()
            ));
        }
    };
    if let Some(ref url) = cli.url {
        profile.url.clone_from(url);
    }
    if let Some(ref username) = cli.username {
        profile.username = Some(username.clone());
    }

    let client = sirs_config::profile_to_client_config(&profile, &profile_name, &cfg.defaults)?;
    let page_size = profile.page_size.unwrap_or(cfg.defaults.page_size).max(1);

    let session = sirs_config::load_session(&profile_name)
        .map_or_else(SessionContext::new, SessionContext::with_session);
    let controller = Controller::new(client, session)?;

    Ok(Connection {
        profile_name,
        controller,
        page_size,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let conn = connect(&cli)?;
    info!(profile = %conn.profile_name, "starting sirs-tui");

    let mut app = App::new(conn.controller.clone(), conn.page_size);
    app.run().await?;

    match conn.controller.session().current() {
        Some(session) => {
            if let Err(e) = sirs_config::save_session(&conn.profile_name, &session) {
                warn!(error = %e, "could not persist session");
            }
        }
        None => {
            if let Err(e) = sirs_config::clear_session(&conn.profile_name) {
                warn!(error = %e, "could not clear stored session");
            }
        }
    }

    Ok(())
}
