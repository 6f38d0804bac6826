//! db-probe - Main entry point.
//!
//! Loads MySQL credentials from a .env file, connects once, runs the
//! diagnostic query and reports the result.

use clap::Parser;
use db_probe::app;
use db_probe::config::Config;
use db_probe::db::MySqlConnector;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr; stdout carries only the status lines.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_tracing(&config);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    match app::run(&config, MySqlConnector::new(), &mut stdout, &mut stderr).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!(error = %e, "Failed to write output");
            ExitCode::FAILURE
        }
    }
}
