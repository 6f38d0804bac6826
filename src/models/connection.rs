//! Connection configuration.
//!
//! Builds the five-field MySQL connection configuration from loaded env
//! variables and converts it into driver connect options.

use crate::env_file::EnvVars;
use crate::error::{ProbeError, ProbeResult};
use sqlx::mysql::MySqlConnectOptions;

pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";
pub const DB_NAME: &str = "DB_NAME";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";

pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Configuration for a single MySQL connection attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    /// Contains sensitive data - never log
    pub password: String,
}

impl DbConfig {
    /// Every variable the builder reads, in lookup order.
    pub const KEYS: [&'static str; 5] = [DB_HOST, DB_PORT, DB_NAME, DB_USER, DB_PASSWORD];

    /// Build a configuration from env variables.
    ///
    /// `DB_PORT` falls back to 3306. All missing required variables are
    /// reported together.
    pub fn from_env(vars: &EnvVars) -> ProbeResult<Self> {
        let host = vars.get(DB_HOST);
        let database = vars.get(DB_NAME);
        let user = vars.get(DB_USER);
        let password = vars.get(DB_PASSWORD);

        let missing: Vec<&str> = [
            (DB_HOST, host),
            (DB_NAME, database),
            (DB_USER, user),
            (DB_PASSWORD, password),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| key)
        .collect();

        let (Some(host), Some(database), Some(user), Some(password)) =
            (host, database, user, password)
        else {
            return Err(ProbeError::missing_variables(missing));
        };

        let port = match vars.get(DB_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ProbeError::invalid_port(DB_PORT, raw))?,
            None => DEFAULT_MYSQL_PORT,
        };

        Ok(Self {
            host: host.to_string(),
            port,
            database: database.to_string(),
            user: user.to_string(),
            password: password.to_string(),
        })
    }

    /// Driver connect options for this configuration.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .charset("utf8mb4")
    }

    /// `user@host:port/database`, safe for logs.
    pub fn display_target(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"****")
            .finish()
    }
}
