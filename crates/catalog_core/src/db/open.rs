//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Map connection strings onto one of those two targets.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const MEMORY_URIS: [&str; 3] = ["sqlite::memory:", ":memory:", "sqlite://:memory:"];

/// Database location resolved from a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    File(PathBuf),
}

impl DatabaseTarget {
    /// Resolves a connection string.
    ///
    /// Accepted forms: `sqlite::memory:`, `:memory:`, `sqlite://<path>`,
    /// `sqlite:<path>` and a bare filesystem path. Any other `scheme://`
    /// is rejected.
    pub fn parse(uri: &str) -> DbResult<Self> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            return Err(DbError::UnsupportedUri(uri.to_string()));
        }
        if MEMORY_URIS.contains(&trimmed) {
            return Ok(Self::Memory);
        }

        let path = if let Some(rest) = trimmed.strip_prefix("sqlite://") {
            rest
        } else if let Some(rest) = trimmed.strip_prefix("sqlite:") {
            rest
        } else if trimmed.contains("://") {
            return Err(DbError::UnsupportedUri(uri.to_string()));
        } else {
            trimmed
        };

        if path.is_empty() {
            return Err(DbError::UnsupportedUri(uri.to_string()));
        }
        Ok(Self::File(PathBuf::from(path)))
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File(_) => "file",
        }
    }
}

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_target(&DatabaseTarget::File(path.as_ref().to_path_buf()))
}

/// Opens an in-memory SQLite database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_target(&DatabaseTarget::Memory)
}

/// Opens the database named by a connection string.
///
/// # Errors
/// - `DbError::UnsupportedUri` when the string does not name SQLite.
/// - Any open or migration error from the resolved target.
pub fn open_db_from_uri(uri: &str) -> DbResult<Connection> {
    let target = DatabaseTarget::parse(uri)?;
    open_target(&target)
}

fn open_target(target: &DatabaseTarget) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match target {
        DatabaseTarget::Memory => Connection::open_in_memory(),
        DatabaseTarget::File(path) => Connection::open(path),
    };
    let mut conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
