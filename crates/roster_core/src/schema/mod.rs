//! Validated transfer schemas exchanged with repository callers.
//!
//! # Responsibility
//! - Mirror the entity model in a storage-agnostic, serializable shape.
//! - Reject field rule violations before any storage access.
//!
//! # Invariants
//! - Schemas are value objects: "updating" one builds a new instance.
//! - Deserialized schemas have already passed `validate()`.
//! - A schema is only built from an entity that storage has persisted.

use crate::model::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod address;
pub mod user;

/// Upper bound accepted for `UserSchema::age`.
pub const MAX_AGE: i64 = 150;

/// Field-level schema rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaValidationError {
    /// An identifier field carries zero or a negative value.
    NonPositiveId { field: &'static str, value: i64 },
    /// Operation requires `id` but the schema has none.
    MissingId,
    BlankName,
    AgeOutOfRange(i64),
    BlankEmail,
    /// Email is not shaped like `local@domain`.
    MalformedEmail,
    /// An embedded address failed validation.
    InvalidAddress {
        index: usize,
        reason: Box<SchemaValidationError>,
    },
}

impl Display for SchemaValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::MissingId => write!(f, "id is required for this operation"),
            Self::BlankName => write!(f, "name must not be blank"),
            Self::AgeOutOfRange(age) => write!(f, "age must be within 0..={MAX_AGE}, got {age}"),
            Self::BlankEmail => write!(f, "email must not be blank"),
            Self::MalformedEmail => write!(f, "email must look like local@domain"),
            Self::InvalidAddress { index, reason } => {
                write!(f, "addresses[{index}]: {reason}")
            }
        }
    }
}

impl Error for SchemaValidationError {}

fn check_id(field: &'static str, value: Option<RecordId>) -> Result<(), SchemaValidationError> {
    match value {
        Some(value) if value <= 0 => Err(SchemaValidationError::NonPositiveId { field, value }),
        _ => Ok(()),
    }
}
