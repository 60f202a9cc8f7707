//! Database connection from `DatabaseConfig`.

use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{DatabaseConfig, MEMORY_DATABASE_URL};

const DEFAULT_MAX_CONNS: u32 = 10;
const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;

fn is_memory_url(url: &str) -> bool {
    url == MEMORY_DATABASE_URL || url == "sqlite://memory:" || url.contains("mode=memory")
}

/// Prepare a SQLite URL for connecting.
///
/// Memory URLs pass through unchanged. For file URLs the path is resolved
/// against `home_dir` when relative, its parent directory is created, and
/// `mode=rwc` is added so a missing database file gets created.
pub fn prepare_sqlite_url(url: &str, home_dir: &Path) -> Result<String> {
    if is_memory_url(url) {
        return Ok(url.to_string());
    }
    let Some(rest) = url.strip_prefix("sqlite:") else {
        return Ok(url.to_string());
    };

    let (path_part, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    let raw = path_part.strip_prefix("//").unwrap_or(path_part);
    let path = PathBuf::from(raw);
    let path = if path.is_absolute() {
        path
    } else {
        home_dir.join(path)
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database dir {}", parent.display()))?;
    }

    let query = match query {
        Some(q) if q.split('&').any(|kv| kv.starts_with("mode=")) => q.to_string(),
        Some(q) if !q.is_empty() => format!("{q}&mode=rwc"),
        _ => "mode=rwc".to_string(),
    };
    Ok(format!(
        "sqlite://{}?{}",
        path.to_string_lossy().replace('\\', "/"),
        query
    ))
}

/// Open a pooled connection described by `cfg`.
pub async fn connect(cfg: &DatabaseConfig, home_dir: &Path) -> Result<DatabaseConnection> {
    let url = prepare_sqlite_url(&cfg.url, home_dir)?;
    let mut opts = ConnectOptions::new(url.clone());

    // Every pooled connection to `sqlite::memory:` would open its own empty database.
    let max_conns = if is_memory_url(&url) {
        1
    } else {
        cfg.max_conns.unwrap_or(DEFAULT_MAX_CONNS).max(1)
    };
    let busy = Duration::from_millis(u64::from(
        cfg.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
    ));
    opts.max_connections(max_conns)
        .min_connections(1)
        .sqlx_logging(false)
        // Applied as `PRAGMA busy_timeout` on every pooled connection.
        .map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy));

    tracing::debug!(url = %url, max_conns, busy_timeout = ?busy, "Connecting to database");
    Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database '{url}'"))
}
