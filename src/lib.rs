pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod pages;
pub mod report;
pub mod session;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::api::HttpApiClient;
use crate::config::ClientConfig;
use crate::session::SessionStore;

pub fn run() -> ExitCode {
    let cli = cli::Cli::parse();

    // Logs go to stderr so rendered pages on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    tracing::debug!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let client_config = match cli.api_url.as_deref() {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env(),
    };
    let api = match HttpApiClient::new(&client_config) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let store = SessionStore::new(config::session_file());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    match cli::execute(cli.command, &api, &store, &mut input, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
