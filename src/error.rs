//! Error types for db-probe.
//!
//! Configuration errors stop the run before any connection is attempted.
//! Connection and query errors are captured by the probe and reported; the
//! caller decides what exit status they map to.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error(".env file not found at {}", .path.display())]
    EnvFileNotFound { path: PathBuf },

    #[error("Failed to parse .env file at {}: {message}", .path.display())]
    EnvFileInvalid { path: PathBuf, message: String },

    #[error("Missing environment variables: {}", .names.join(", "))]
    MissingVariables { names: Vec<String> },

    #[error("Invalid value for {variable}: '{value}' is not a valid port number")]
    InvalidPort { variable: String, value: String },

    #[error("{message}")]
    Connection { message: String, suggestion: String },

    #[error("{}", with_sql_state(.message, .sql_state.as_deref()))]
    Database {
        message: String,
        /// e.g. "28000" for access denied
        sql_state: Option<String>,
    },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout { operation: String, elapsed_secs: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ProbeError {
    pub fn env_file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::EnvFileNotFound { path: path.into() }
    }

    pub fn env_file_invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::EnvFileInvalid {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn missing_variables<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingVariables {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn invalid_port(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidPort {
            variable: variable.into(),
            value: value.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    pub fn database(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
        }
    }

    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// True for errors raised while loading or validating configuration.
    ///
    /// These are fatal; everything else comes out of the connection attempt.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EnvFileNotFound { .. }
                | Self::EnvFileInvalid { .. }
                | Self::MissingVariables { .. }
                | Self::InvalidPort { .. }
        )
    }
}

fn with_sql_state(message: &str, sql_state: Option<&str>) -> String {
    match sql_state {
        Some(code) => format!("{} (SQLSTATE: {})", message, code),
        None => message.to_string(),
    }
}

/// Convert sqlx errors to ProbeError.
impl From<sqlx::Error> for ProbeError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => ProbeError::connection(
                msg.to_string(),
                "Check DB_HOST, DB_PORT and the credentials in the .env file",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                ProbeError::database(db_err.message(), code)
            }
            sqlx::Error::RowNotFound => ProbeError::database("No rows returned", None),
            sqlx::Error::Io(io_err) => ProbeError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity, security groups and database server status",
            ),
            sqlx::Error::Tls(tls_err) => ProbeError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => ProbeError::connection(
                format!("Protocol error: {}", msg),
                "Check that the server speaks the MySQL protocol",
            ),
            sqlx::Error::ColumnDecode { index, source } => {
                ProbeError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                ProbeError::internal(format!("Decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => ProbeError::internal("Database worker crashed"),
            _ => ProbeError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variables_joins_names() {
        let err = ProbeError::missing_variables(["DB_HOST", "DB_PASSWORD"]);
        assert_eq!(
            err.to_string(),
            "Missing environment variables: DB_HOST, DB_PASSWORD"
        );
    }

    #[test]
    fn test_env_file_not_found_names_path() {
        let err = ProbeError::env_file_not_found("/opt/app/../.env");
        assert_eq!(err.to_string(), ".env file not found at /opt/app/../.env");
    }

    #[test]
    fn test_database_error_includes_sql_state() {
        let err = ProbeError::database("Access denied", Some("28000".to_string()));
        assert_eq!(err.to_string(), "Access denied (SQLSTATE: 28000)");

        let err = ProbeError::database("Access denied", None);
        assert_eq!(err.to_string(), "Access denied");
    }

    #[test]
    fn test_error_suggestion() {
        let err = ProbeError::connection("refused", "Check the server");
        assert_eq!(err.suggestion(), Some("Check the server"));
        assert_eq!(ProbeError::timeout("connect", 5).suggestion(), None);
    }

    #[test]
    fn test_is_configuration() {
        assert!(ProbeError::env_file_not_found(".env").is_configuration());
        assert!(ProbeError::env_file_invalid(".env", "bad line").is_configuration());
        assert!(ProbeError::missing_variables(["DB_USER"]).is_configuration());
        assert!(ProbeError::invalid_port("DB_PORT", "abc").is_configuration());
        assert!(!ProbeError::connection("refused", "retry").is_configuration());
        assert!(!ProbeError::database("denied", None).is_configuration());
        assert!(!ProbeError::timeout("connect", 5).is_configuration());
    }

    #[test]
    fn test_io_error_maps_to_connection() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: ProbeError = sqlx::Error::Io(io).into();
        assert!(matches!(err, ProbeError::Connection { .. }));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_row_not_found_maps_to_database() {
        let err: ProbeError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ProbeError::Database { .. }));
    }
}
