//! `addresses` row model.

use super::{assign_once, EntityStateError, RecordId};
use crate::schema::address::AddressSchema;

/// Dependent record; `user_id` is the back-reference to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: Option<RecordId>,
    /// Unique across all addresses (enforced by storage).
    pub email: String,
    /// Immutable after creation.
    pub user_id: RecordId,
}

impl Address {
    pub const ENTITY: &'static str = "address";

    pub fn from_schema(schema: &AddressSchema) -> Self {
        Self {
            id: None,
            email: schema.email.clone(),
            user_id: schema.user_id,
        }
    }

    pub fn assign_id(&mut self, id: RecordId) -> Result<(), EntityStateError> {
        assign_once(&mut self.id, Self::ENTITY, id)
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn persisted_id(&self) -> Result<RecordId, EntityStateError> {
        self.id.ok_or(EntityStateError::Unpersisted {
            entity: Self::ENTITY,
        })
    }
}
