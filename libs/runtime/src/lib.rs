//! Process-level plumbing shared by the binaries: layered configuration,
//! logging setup, home directory resolution and database connection.

pub mod config;
pub mod db;
pub mod logging;
pub mod paths;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section, ServerConfig};
