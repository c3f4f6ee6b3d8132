//! postflow - a terminal front end for the social media content
//! automation service.
//!
//! Connect accounts, manage topics and schedules, generate posts and
//! check activity without leaving the shell.

mod app;
mod cli;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use postflow_core::{ApiError, Config};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use cli::Cli;

/// Exit code when the server ended the session
const EXIT_SESSION_EXPIRED: u8 = 2;

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes buffered log lines when dropped.
fn init_tracing() -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();
    guard
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let base_url = cli
        .api_url
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| config.base_url());

    let mut app = App::new(config, base_url)?;
    app.run(cli.command).await
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing();
    info!("postflow starting");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let expired = e
                .downcast_ref::<ApiError>()
                .map(ApiError::is_session_expired)
                .unwrap_or(false);
            if expired {
                // The navigator has already told the user to log in again
                return ExitCode::from(EXIT_SESSION_EXPIRED);
            }
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
