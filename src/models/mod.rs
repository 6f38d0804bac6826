//! Data models for db-probe.

pub mod connection;

pub use connection::{
    DB_HOST, DB_NAME, DB_PASSWORD, DB_PORT, DB_USER, DEFAULT_MYSQL_PORT, DbConfig,
};
