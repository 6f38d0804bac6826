//! Run orchestration: load env file, build the configuration, probe, report.

use crate::config::{Config, EXIT_CONFIG_ERROR, EXIT_OK};
use crate::db::{ConnectionProbe, Connector, ProbeOutcome};
use crate::env_file::EnvVars;
use crate::error::ProbeResult;
use crate::models::DbConfig;
use std::collections::HashMap;
use std::io::Write;
use tracing::error;

/// Load the env file and build the connection configuration.
///
/// `process_env` values win over the file for the keys the builder reads.
pub fn load_config(
    config: &Config,
    process_env: &HashMap<String, String>,
) -> ProbeResult<DbConfig> {
    let path = config.env_file_path()?;
    let vars = EnvVars::load(&path)?.with_overrides(&DbConfig::KEYS, process_env);
    DbConfig::from_env(&vars)
}

/// Run one probe, writing status lines to `out` and configuration errors to
/// `err`. Returns the process exit status.
pub async fn run_with_env<C, W, E>(
    config: &Config,
    connector: C,
    process_env: &HashMap<String, String>,
    out: &mut W,
    err: &mut E,
) -> std::io::Result<u8>
where
    C: Connector,
    W: Write,
    E: Write,
{
    let db_config = match load_config(config, process_env) {
        Ok(db_config) => db_config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            writeln!(err, "Error: {}", e)?;
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    let outcome = ConnectionProbe::new(connector)
        .with_connect_timeout(config.connect_timeout_duration())
        .run(&db_config)
        .await;

    report(&outcome, out)?;

    Ok(if outcome.is_success() {
        EXIT_OK
    } else {
        config.connection_error_exit_code()
    })
}

/// [`run_with_env`] against the current process environment.
pub async fn run<C, W, E>(
    config: &Config,
    connector: C,
    out: &mut W,
    err: &mut E,
) -> std::io::Result<u8>
where
    C: Connector,
    W: Write,
    E: Write,
{
    let process_env: HashMap<String, String> = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect();
    run_with_env(config, connector, &process_env, out, err).await
}

fn report<W: Write>(outcome: &ProbeOutcome, out: &mut W) -> std::io::Result<()> {
    for line in outcome.lines() {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}
