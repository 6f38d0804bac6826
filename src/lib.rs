//! db-probe library
//!
//! Connectivity check for a MySQL (e.g. AWS RDS) instance whose credentials
//! live in a `.env` file: load, validate, connect, run `SELECT DATABASE();`,
//! report, close.

pub mod app;
pub mod config;
pub mod db;
pub mod env_file;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{ProbeError, ProbeResult};
