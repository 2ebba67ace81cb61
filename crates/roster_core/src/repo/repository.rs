//! Repository contract and error taxonomy.

use crate::db::{DbError, Session};
use crate::model::{EntityStateError, RecordId};
use crate::schema::SchemaValidationError;
use rusqlite::ffi;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Which storage rule rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
    Other,
}

impl ConstraintKind {
    fn from_extended_code(code: i32) -> Self {
        match code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Self::Unique,
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::ForeignKey,
            ffi::SQLITE_CONSTRAINT_NOTNULL => Self::NotNull,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign_key",
            Self::NotNull => "not_null",
            Self::Other => "other",
        }
    }
}

/// Errors from repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Schema failed field rules; storage was not touched.
    Validation(SchemaValidationError),
    /// No row with this id.
    NotFound { entity: &'static str, id: RecordId },
    /// Storage rejected the write.
    Constraint {
        kind: ConstraintKind,
        message: String,
    },
    /// Any other storage failure.
    Db(DbError),
    /// Persisted or in-flight data cannot form a valid schema.
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Stable short code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Constraint { .. } => "constraint",
            Self::Db(_) => "db",
            Self::InvalidData(_) => "invalid_data",
            Self::MissingRequiredTable(_) | Self::MissingRequiredColumn { .. } => "schema_missing",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Constraint { kind, message } => {
                write!(f, "storage rejected write ({}): {message}", kind.as_str())
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. }
            | Self::Constraint { .. }
            | Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<SchemaValidationError> for RepoError {
    fn from(value: SchemaValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<EntityStateError> for RepoError {
    fn from(value: EntityStateError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            if failure.code == ErrorCode::ConstraintViolation {
                return Self::Constraint {
                    kind: ConstraintKind::from_extended_code(failure.extended_code),
                    message: message.clone().unwrap_or_else(|| failure.to_string()),
                };
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Save/get/update contract over one entity/schema pair.
///
/// Implementations open one session per call and never hold entities
/// between calls.
pub trait Repository {
    /// Persisted row type.
    type Entity;
    /// Validated transfer type exchanged with callers.
    type Schema;

    /// Looks up the row by primary key inside an open session.
    fn find_entity(&self, session: &Session<'_>, id: RecordId)
        -> RepoResult<Option<Self::Entity>>;

    /// Inserts a new row from the schema's non-key fields.
    ///
    /// Any `id` on the input is ignored. Returns a new schema carrying the
    /// storage-assigned id; the input is never modified.
    fn save(&self, schema: &Self::Schema) -> RepoResult<Self::Schema>;

    /// Loads the schema for `id`, or `NotFound`.
    fn get(&self, id: RecordId) -> RepoResult<Self::Schema>;

    /// Overwrites the mutable fields of the row matching `schema.id`.
    ///
    /// Returns the schema as persisted. A stale id yields `NotFound` and
    /// nothing is written.
    fn update(&self, schema: &Self::Schema) -> RepoResult<Self::Schema>;
}

#[cfg(test)]
mod tests {
    use super::{ConstraintKind, RepoError};
    use crate::db::DbError;
    use rusqlite::ffi;

    #[test]
    fn constraint_failures_are_classified() {
        let err = rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_CONSTRAINT_UNIQUE),
            Some("UNIQUE constraint failed: addresses.email".to_string()),
        );
        match RepoError::from(err) {
            RepoError::Constraint { kind, message } => {
                assert_eq!(kind, ConstraintKind::Unique);
                assert!(message.contains("addresses.email"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
            None,
        );
        assert!(matches!(
            RepoError::from(DbError::Sqlite(err)),
            RepoError::Constraint {
                kind: ConstraintKind::ForeignKey,
                ..
            }
        ));
    }

    #[test]
    fn non_constraint_failures_stay_db_errors() {
        let err = RepoError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));
        assert_eq!(err.code(), "db");
    }
}
