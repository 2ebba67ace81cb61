//! Connection bootstrap and session factory.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by repository behavior.
//! - Run the table bootstrap before handing out sessions.
//!
//! # Invariants
//! - The gateway connection has `foreign_keys=ON`.
//! - The gateway connection has the current schema applied.

use super::bootstrap::ensure_schema;
use super::config::{StorageConfig, StorageLocation};
use super::session::{Session, SessionMode};
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Shared storage gateway injected into every repository.
///
/// Owns the one connection of the process; repositories borrow it and open
/// a fresh `Session` per operation.
#[derive(Debug)]
pub struct Gateway {
    conn: Connection,
}

impl Gateway {
    /// Opens the store described by `config` and bootstraps its tables.
    ///
    /// # Side effects
    /// - Creates the database file when it does not exist yet.
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(config: &StorageConfig) -> DbResult<Self> {
        let started_at = Instant::now();
        let mode = config.mode_label();
        info!("event=db_open module=db status=start mode={mode}");

        let opened = match &config.location {
            StorageLocation::Memory => Connection::open_in_memory(),
            StorageLocation::File(path) => Connection::open(path),
        };
        let mut conn = match opened {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                    mode,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        match bootstrap_connection(&mut conn, config.busy_timeout()) {
            Ok(()) => {
                info!(
                    "event=db_open module=db status=ok mode={} duration_ms={}",
                    mode,
                    started_at.elapsed().as_millis()
                );
                Ok(Self { conn })
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                    mode,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::open(&StorageConfig::in_memory())
    }

    /// Opens (or creates) a database file.
    pub fn open_file(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::open(&StorageConfig::file(path.as_ref()))
    }

    /// Adopts a connection opened elsewhere, applying the same bootstrap.
    pub fn attach(mut conn: Connection) -> DbResult<Self> {
        bootstrap_connection(&mut conn, StorageConfig::default().busy_timeout())?;
        info!("event=db_open module=db status=ok mode=attached");
        Ok(Self { conn })
    }

    /// Starts a new unit of work on the shared connection.
    pub fn open_session(&self, mode: SessionMode) -> DbResult<Session<'_>> {
        Session::begin(&self.conn, mode)
    }

    /// Raw connection, for diagnostics and schema checks.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn bootstrap_connection(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    ensure_schema(conn)?;
    Ok(())
}
