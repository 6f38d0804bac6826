//! Command-line configuration for db-probe.
//!
//! Every option can also be supplied through a `DB_PROBE_*` environment
//! variable. Database credentials are not options; they come from the env file.

use crate::env_file::default_env_file_path;
use crate::error::ProbeResult;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Exit status for a completed run.
pub const EXIT_OK: u8 = 0;
/// Exit status for a missing or invalid configuration.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit status for a connection failure with `--fail-on-connection-error`.
pub const EXIT_CONNECTION_ERROR: u8 = 2;

/// Configuration for db-probe.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "db-probe",
    about = "Check connectivity to a MySQL / AWS RDS instance configured in a .env file",
    version,
    author
)]
pub struct Config {
    /// Path to the env file holding DB_HOST, DB_PORT, DB_NAME, DB_USER and DB_PASSWORD.
    /// Defaults to ../.env relative to the directory of this executable.
    #[arg(long, value_name = "PATH", env = "DB_PROBE_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Connect timeout in seconds (no timeout when unset)
    #[arg(long, value_name = "SECS", env = "DB_PROBE_CONNECT_TIMEOUT")]
    pub connect_timeout: Option<u64>,

    /// Exit with status 2 when the connection or query fails
    /// (by default such failures are reported and the exit status is 0)
    #[arg(long, env = "DB_PROBE_FAIL_ON_CONNECTION_ERROR")]
    pub fail_on_connection_error: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = DEFAULT_LOG_LEVEL, env = "DB_PROBE_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "DB_PROBE_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            env_file: None,
            connect_timeout: None,
            fail_on_connection_error: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
        }
    }

    /// The env file to load: the explicit path, or the default next to the executable.
    pub fn env_file_path(&self) -> ProbeResult<PathBuf> {
        match &self.env_file {
            Some(path) => Ok(path.clone()),
            None => default_env_file_path(),
        }
    }

    /// Get the connect timeout as a Duration.
    pub fn connect_timeout_duration(&self) -> Option<Duration> {
        self.connect_timeout.map(Duration::from_secs)
    }

    /// Exit status for a run whose connection attempt failed.
    pub fn connection_error_exit_code(&self) -> u8 {
        if self.fail_on_connection_error {
            EXIT_CONNECTION_ERROR
        } else {
            EXIT_OK
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
