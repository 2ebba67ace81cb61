//! Scoped unit of work over the gateway connection.
//!
//! # Invariants
//! - A session wraps exactly one SQLite transaction.
//! - `commit` is the only way to persist writes; every other exit rolls back.

use super::DbResult;
use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::ops::Deref;
use std::time::Instant;

/// Locking intent for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Deferred transaction; takes the write lock only if it writes.
    Read,
    /// Immediate transaction; takes the write lock up front.
    Write,
}

impl SessionMode {
    fn behavior(self) -> TransactionBehavior {
        match self {
            Self::Read => TransactionBehavior::Deferred,
            Self::Write => TransactionBehavior::Immediate,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// One open transaction borrowed from a `Gateway`.
///
/// Derefs to `Connection` so repository code issues statements on it
/// directly. Dropping the session without calling `commit` rolls back.
pub struct Session<'g> {
    tx: Transaction<'g>,
    release: ReleaseLog,
}

impl<'g> Session<'g> {
    pub(crate) fn begin(conn: &'g Connection, mode: SessionMode) -> DbResult<Self> {
        let tx = Transaction::new_unchecked(conn, mode.behavior())?;
        debug!(
            "event=session_open module=db status=ok mode={}",
            mode.as_str()
        );
        Ok(Self {
            tx,
            release: ReleaseLog {
                mode,
                opened_at: Instant::now(),
                committed: false,
            },
        })
    }

    /// Commits the unit of work.
    ///
    /// On failure the transaction is rolled back before the error returns.
    pub fn commit(self) -> DbResult<()> {
        let Session { tx, mut release } = self;
        match tx.commit() {
            Ok(()) => {
                release.committed = true;
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=session_commit module=db status=error mode={} error={}",
                    release.mode.as_str(),
                    err
                );
                Err(err.into())
            }
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.release.mode
    }
}

impl Deref for Session<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.tx
    }
}

struct ReleaseLog {
    mode: SessionMode,
    opened_at: Instant,
    committed: bool,
}

impl Drop for ReleaseLog {
    fn drop(&mut self) {
        let duration_ms = self.opened_at.elapsed().as_millis();
        if self.committed {
            debug!(
                "event=session_release module=db status=committed mode={} duration_ms={}",
                self.mode.as_str(),
                duration_ms
            );
        } else if self.mode == SessionMode::Write {
            warn!(
                "event=session_release module=db status=rolled_back mode={} duration_ms={}",
                self.mode.as_str(),
                duration_ms
            );
        } else {
            debug!(
                "event=session_release module=db status=closed mode={} duration_ms={}",
                self.mode.as_str(),
                duration_ms
            );
        }
    }
}
