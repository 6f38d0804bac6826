//! Scripted connector used by the integration tests.

#![allow(dead_code)]

use db_probe::ProbeError;
use db_probe::ProbeResult;
use db_probe::db::{Connector, DiagnosticSession};
use db_probe::models::DbConfig;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub enum Script {
    /// Connect succeeds and both queries answer.
    Healthy {
        version: String,
        database: Option<String>,
    },
    /// Connect fails as an unreachable host would.
    Unreachable,
    /// Connect succeeds, the diagnostic query fails.
    QueryFails,
    /// Connect succeeds, the graceful close fails.
    CloseFails,
    /// Connect never completes within the test.
    Hangs,
}

#[derive(Debug, Default)]
pub struct Counters {
    pub connects: AtomicUsize,
    pub closes: AtomicUsize,
    pub last_config: Mutex<Option<DbConfig>>,
}

impl Counters {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn last_config(&self) -> Option<DbConfig> {
        self.last_config.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedConnector {
    pub script: Script,
    pub counters: Arc<Counters>,
}

impl ScriptedConnector {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn healthy() -> Self {
        Self::new(Script::Healthy {
            version: "8.0.35".to_string(),
            database: Some("sales".to_string()),
        })
    }
}

pub struct ScriptedSession {
    script: Script,
    counters: Arc<Counters>,
}

impl DiagnosticSession for ScriptedSession {
    async fn server_version(&mut self) -> ProbeResult<String> {
        match &self.script {
            Script::Healthy { version, .. } => Ok(version.clone()),
            _ => Ok("8.0.35".to_string()),
        }
    }

    async fn current_database(&mut self) -> ProbeResult<Option<String>> {
        match &self.script {
            Script::Healthy { database, .. } => Ok(database.clone()),
            Script::QueryFails => Err(ProbeError::database(
                "Lost connection to MySQL server during query",
                Some("HY000".to_string()),
            )),
            _ => Ok(Some("sales".to_string())),
        }
    }

    async fn close(self) -> ProbeResult<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Script::CloseFails => Err(ProbeError::connection("broken pipe", "none")),
            _ => Ok(()),
        }
    }
}

impl Connector for ScriptedConnector {
    type Session = ScriptedSession;

    async fn connect(&self, config: &DbConfig) -> ProbeResult<ScriptedSession> {
        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        *self.counters.last_config.lock().unwrap() = Some(config.clone());
        match self.script {
            Script::Unreachable => Err(ProbeError::connection(
                format!("Failed to connect: I/O error: Connection refused ({})", config.host),
                "Check that the MySQL server is running and accessible",
            )),
            Script::Hangs => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ProbeError::internal("unreachable"))
            }
            _ => Ok(ScriptedSession {
                script: self.script.clone(),
                counters: Arc::clone(&self.counters),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "MySQL"
    }
}

/// Write `contents` to a fresh temporary env file.
pub fn env_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub const FULL_ENV: &str = "\
DB_HOST=mydb.abc123.us-east-1.rds.amazonaws.com
DB_PORT=3306
DB_NAME=sales
DB_USER=admin
DB_PASSWORD=s3cret
";
