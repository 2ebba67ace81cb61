//! Persisted entity model for users and their addresses.
//!
//! # Responsibility
//! - Define the storage-side records mirrored by the transfer schemas.
//! - Track the Unpersisted -> Persisted lifecycle of a surrogate key.
//!
//! # Invariants
//! - `id` is `None` until storage assigns one, and never changes after.
//! - An address always references exactly one user.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod address;
pub mod user;

/// Storage-assigned surrogate key (`INTEGER PRIMARY KEY`).
pub type RecordId = i64;

/// Lifecycle violations on an entity's surrogate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityStateError {
    /// Entity was used where a persisted id is required.
    Unpersisted { entity: &'static str },
    /// Entity already carries an id and cannot be assigned another.
    AlreadyPersisted {
        entity: &'static str,
        id: RecordId,
    },
}

impl Display for EntityStateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unpersisted { entity } => write!(f, "{entity} has not been persisted yet"),
            Self::AlreadyPersisted { entity, id } => {
                write!(f, "{entity} is already persisted with id {id}")
            }
        }
    }
}

impl Error for EntityStateError {}

pub(crate) fn assign_once(
    slot: &mut Option<RecordId>,
    entity: &'static str,
    id: RecordId,
) -> Result<(), EntityStateError> {
    if let Some(existing) = *slot {
        return Err(EntityStateError::AlreadyPersisted {
            entity,
            id: existing,
        });
    }
    *slot = Some(id);
    Ok(())
}
