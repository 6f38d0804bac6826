//! Connection tester.
//!
//! Runs one connect / query / close cycle and records what happened in a
//! [`ProbeOutcome`]. Failures are captured rather than propagated so the
//! caller can report them and pick an exit status.

use crate::db::session::{Connector, SessionGuard};
use crate::error::{ProbeError, ProbeResult};
use crate::models::DbConfig;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-run connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeState {
    #[default]
    NotConnected,
    Connecting,
    Connected,
    Queried,
    Failed,
    Closed,
}

impl std::fmt::Display for ProbeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not_connected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Queried => write!(f, "queried"),
            Self::Failed => write!(f, "failed"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Result of one probe run.
#[derive(Debug, Default)]
pub struct ProbeOutcome {
    /// Server family, e.g. "MySQL".
    pub server: &'static str,
    pub server_version: Option<String>,
    /// Outer `Some` once the diagnostic query ran; inner `None` for a NULL result.
    pub database: Option<Option<String>>,
    pub error: Option<ProbeError>,
    /// True once an established connection has been released.
    pub closed: bool,
    pub state: ProbeState,
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Status lines for the console, in the order the events happened.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(version) = &self.server_version {
            lines.push(format!(
                "Connected to {} Server version {}",
                self.server, version
            ));
        }
        if let Some(database) = &self.database {
            lines.push(format!(
                "You're connected to database: {}",
                database.as_deref().unwrap_or("(none)")
            ));
        }
        if let Some(error) = &self.error {
            lines.push(format!("Error while connecting to {}: {}", self.server, error));
        }
        if self.closed {
            lines.push(format!("{} connection is closed", self.server));
        }
        lines
    }

    /// Convert into a `Result`, surfacing any captured error.
    pub fn into_result(self) -> ProbeResult<Self> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    fn transition(&mut self, state: ProbeState) {
        debug!(from = %self.state, to = %state, "Probe state change");
        self.state = state;
    }
}

/// Runs the diagnostic cycle through a [`Connector`].
#[derive(Debug, Clone)]
pub struct ConnectionProbe<C> {
    connector: C,
    connect_timeout: Option<Duration>,
}

impl<C: Connector> ConnectionProbe<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            connect_timeout: None,
        }
    }

    /// Bound the connect step. Without this a hung connect blocks forever.
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Connect, query, and always release an established connection.
    pub async fn run(&self, config: &DbConfig) -> ProbeOutcome {
        let mut outcome = ProbeOutcome {
            server: self.connector.name(),
            ..ProbeOutcome::default()
        };

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            user = %config.user,
            "Connecting to database"
        );
        outcome.transition(ProbeState::Connecting);

        let session = match self.connect(config).await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, suggestion = ?e.suggestion(), "Connection failed");
                outcome.error = Some(e);
                outcome.transition(ProbeState::Failed);
                return outcome;
            }
        };
        outcome.transition(ProbeState::Connected);

        let mut guard = SessionGuard::new(session);
        match Self::query(&mut guard, &mut outcome).await {
            Ok(()) => outcome.transition(ProbeState::Queried),
            Err(e) => {
                warn!(error = %e, "Diagnostic query failed");
                outcome.error = Some(e);
                outcome.transition(ProbeState::Failed);
            }
        }

        if let Err(e) = guard.release().await {
            warn!(error = %e, "Graceful close failed; connection dropped");
        }
        outcome.closed = true;
        outcome.transition(ProbeState::Closed);
        info!("Connection closed");

        outcome
    }

    async fn connect(&self, config: &DbConfig) -> ProbeResult<C::Session> {
        match self.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.connector.connect(config))
                .await
                .map_err(|_| ProbeError::timeout("connect", timeout.as_secs()))?,
            None => self.connector.connect(config).await,
        }
    }

    async fn query(
        guard: &mut SessionGuard<C::Session>,
        outcome: &mut ProbeOutcome,
    ) -> ProbeResult<()> {
        let version = guard.server_version().await?;
        info!(version = %version, "Got server version");
        outcome.server_version = Some(version);

        let database = guard.current_database().await?;
        info!(database = ?database, "Diagnostic query returned");
        outcome.database = Some(database);
        Ok(())
    }
}
