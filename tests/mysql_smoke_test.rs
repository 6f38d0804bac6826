//! Live check against a real MySQL server.
//!
//! Set DB_PROBE_TEST_ENV_FILE to an env file with DB_HOST, DB_NAME, DB_USER
//! and DB_PASSWORD for a reachable server to run these tests.
//! Example: DB_PROBE_TEST_ENV_FILE=/path/to/.env cargo test --test mysql_smoke_test

use db_probe::app::{load_config, run_with_env};
use db_probe::config::{Config, EXIT_OK};
use db_probe::db::{ConnectionProbe, MySqlConnector, ProbeState};
use std::collections::HashMap;
use std::path::PathBuf;

fn test_config() -> Option<Config> {
    match std::env::var("DB_PROBE_TEST_ENV_FILE") {
        Ok(path) => Some(Config {
            env_file: Some(PathBuf::from(path)),
            ..Config::default()
        }),
        Err(_) => {
            eprintln!("Skipping test: DB_PROBE_TEST_ENV_FILE not set");
            None
        }
    }
}

#[tokio::test]
async fn test_live_probe_reports_database() {
    let Some(config) = test_config() else {
        return;
    };
    let db_config = load_config(&config, &HashMap::new()).unwrap();

    let outcome = ConnectionProbe::new(MySqlConnector::new())
        .run(&db_config)
        .await;

    assert!(outcome.is_success(), "probe failed: {:?}", outcome.error);
    assert_eq!(outcome.state, ProbeState::Closed);
    assert!(outcome.server_version.is_some());
    assert_eq!(outcome.database, Some(Some(db_config.database.clone())));
}

#[tokio::test]
async fn test_live_run_output() {
    let Some(config) = test_config() else {
        return;
    };
    let mut out = Vec::new();
    let mut err = Vec::new();

    let code = run_with_env(&config, MySqlConnector::new(), &HashMap::new(), &mut out, &mut err)
        .await
        .unwrap();

    let stdout = String::from_utf8(out).unwrap();
    assert_eq!(code, EXIT_OK);
    assert!(stdout.starts_with("Connected to MySQL Server version "));
    assert!(stdout.contains("You're connected to database: "));
    assert!(stdout.ends_with("MySQL connection is closed\n"));
}
