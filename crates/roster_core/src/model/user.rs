//! `users` row model.

use super::{assign_once, EntityStateError, RecordId};
use crate::schema::user::UserSchema;

/// Top-level persisted record; owns zero or more addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<RecordId>,
    pub name: String,
    pub age: i64,
}

impl User {
    pub const ENTITY: &'static str = "user";

    /// Builds an unpersisted user from the schema's non-key fields.
    ///
    /// Embedded addresses are ignored; they are never created through a user.
    pub fn from_schema(schema: &UserSchema) -> Self {
        Self {
            id: None,
            name: schema.name.clone(),
            age: schema.age,
        }
    }

    /// Records the storage-assigned key. Allowed exactly once.
    pub fn assign_id(&mut self, id: RecordId) -> Result<(), EntityStateError> {
        assign_once(&mut self.id, Self::ENTITY, id)
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the key, or `Unpersisted` when storage never assigned one.
    pub fn persisted_id(&self) -> Result<RecordId, EntityStateError> {
        self.id.ok_or(EntityStateError::Unpersisted {
            entity: Self::ENTITY,
        })
    }
}
