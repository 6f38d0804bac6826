//! Single-connection sessions.
//!
//! The probe talks to the server through [`Connector`] and
//! [`DiagnosticSession`]; [`MySqlConnector`] is the real driver. An open
//! session is held by a [`SessionGuard`] so it is released on every path.

use crate::error::{ProbeError, ProbeResult};
use crate::models::DbConfig;
use sqlx::{ConnectOptions, Connection, MySqlConnection};
use std::future::Future;
use tracing::{debug, warn};

/// Fixed statement used to confirm connectivity.
pub const DIAGNOSTIC_QUERY: &str = "SELECT DATABASE();";

/// Statement used to read the server version.
pub const VERSION_QUERY: &str = "SELECT VERSION()";

/// An open connection able to answer the diagnostic queries.
pub trait DiagnosticSession: Send {
    /// Server version string, e.g. `8.0.35`.
    fn server_version(&mut self) -> impl Future<Output = ProbeResult<String>> + Send;

    /// Active database name; `None` when the server reports NULL.
    fn current_database(&mut self) -> impl Future<Output = ProbeResult<Option<String>>> + Send;

    /// Close the connection gracefully.
    fn close(self) -> impl Future<Output = ProbeResult<()>> + Send;
}

/// Opens sessions for a configuration.
pub trait Connector: Send + Sync {
    type Session: DiagnosticSession;

    fn connect(
        &self,
        config: &DbConfig,
    ) -> impl Future<Output = ProbeResult<Self::Session>> + Send;

    /// Name of the server family for console output.
    fn name(&self) -> &'static str;
}

/// Connector backed by a single sqlx MySQL connection (no pool).
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

impl MySqlConnector {
    pub fn new() -> Self {
        Self
    }

    fn connection_suggestion(error: &sqlx::Error) -> &'static str {
        let error_str = error.to_string().to_lowercase();

        if error_str.contains("connection refused") {
            return "Check that the MySQL server is running and accessible";
        }
        if error_str.contains("access denied") || error_str.contains("password") {
            return "Verify DB_USER and DB_PASSWORD in the .env file";
        }
        if error_str.contains("unknown database") {
            return "Check that DB_NAME exists on the server";
        }
        if error_str.contains("tls") || error_str.contains("ssl") {
            return "Check TLS/SSL configuration or build with a tls feature";
        }
        if error_str.contains("lookup") || error_str.contains("resolve") {
            return "Check that DB_HOST is a resolvable hostname";
        }
        "Check DB_HOST and DB_PORT, and that the instance accepts connections from this machine"
    }
}

impl Connector for MySqlConnector {
    type Session = MySqlSession;

    async fn connect(&self, config: &DbConfig) -> ProbeResult<MySqlSession> {
        let conn = config.connect_options().connect().await.map_err(|e| match e {
            // Keep server-side errors (e.g. access denied) with their SQLSTATE.
            sqlx::Error::Database(_) => ProbeError::from(e),
            other => ProbeError::connection(
                format!("Failed to connect: {}", other),
                Self::connection_suggestion(&other),
            ),
        })?;
        debug!(target_db = %config.display_target(), "MySQL connection established");
        Ok(MySqlSession { conn })
    }

    fn name(&self) -> &'static str {
        "MySQL"
    }
}

/// Open MySQL connection.
#[derive(Debug)]
pub struct MySqlSession {
    conn: MySqlConnection,
}

impl DiagnosticSession for MySqlSession {
    async fn server_version(&mut self) -> ProbeResult<String> {
        let version = sqlx::query_scalar::<_, String>(VERSION_QUERY)
            .fetch_one(&mut self.conn)
            .await?;
        Ok(version)
    }

    async fn current_database(&mut self) -> ProbeResult<Option<String>> {
        let database = sqlx::query_scalar::<_, Option<String>>(DIAGNOSTIC_QUERY)
            .fetch_one(&mut self.conn)
            .await?;
        Ok(database)
    }

    async fn close(self) -> ProbeResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}

/// Owns an open session until it is explicitly released.
///
/// Prefer [`SessionGuard::release`]; dropping an unreleased guard drops the
/// socket without a graceful close and logs a warning.
pub struct SessionGuard<S: DiagnosticSession> {
    session: Option<S>,
}

impl<S: DiagnosticSession> std::fmt::Debug for SessionGuard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("released", &self.session.is_none())
            .finish_non_exhaustive()
    }
}

impl<S: DiagnosticSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self {
            session: Some(session),
        }
    }

    fn session_mut(&mut self) -> ProbeResult<&mut S> {
        self.session
            .as_mut()
            .ok_or_else(|| ProbeError::internal("Connection already released"))
    }

    pub async fn server_version(&mut self) -> ProbeResult<String> {
        self.session_mut()?.server_version().await
    }

    pub async fn current_database(&mut self) -> ProbeResult<Option<String>> {
        self.session_mut()?.current_database().await
    }

    /// Close the session. The connection is gone afterwards even if the
    /// graceful close fails.
    pub async fn release(mut self) -> ProbeResult<()> {
        match self.session.take() {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }
}

impl<S: DiagnosticSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if self.session.take().is_some() {
            warn!("Connection dropped without release - consider using explicit release()");
        }
    }
}
