//! SQLite storage gateway and schema bootstrap.
//!
//! # Responsibility
//! - Own the single shared connection that every repository is built on.
//! - Issue scoped units of work (`Session`) for repository operations.
//! - Create the `users`/`addresses` tables before any data access.
//!
//! # Invariants
//! - Bootstrap version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before bootstrap succeeds.
//! - Every session is committed explicitly or rolled back when dropped.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod bootstrap;
mod config;
mod gateway;
mod session;

pub use config::{StorageConfig, StorageLocation};
pub use gateway::Gateway;
pub use session::{Session, SessionMode};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
