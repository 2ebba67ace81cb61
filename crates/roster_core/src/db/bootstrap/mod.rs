//! Table bootstrap for the `users`/`addresses` store.
//!
//! # Responsibility
//! - Create both tables on a fresh database.
//! - Refuse databases written by a newer build.
//!
//! # Invariants
//! - Bootstrap SQL is idempotent (`IF NOT EXISTS`).
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const INIT_SQL: &str = include_str!("0001_init.sql");

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

/// Creates the tables if they are missing and stamps the schema version.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    if current_version == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(INIT_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
