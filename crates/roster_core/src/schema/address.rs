//! Address transfer schema.

use super::{check_id, SchemaValidationError};
use crate::model::address::Address;
use crate::model::{EntityStateError, RecordId};
use serde::{Deserialize, Serialize};

/// Storage-agnostic view of one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AddressSchemaInput")]
pub struct AddressSchema {
    /// `None` until the address has been saved.
    pub id: Option<RecordId>,
    pub email: String,
    /// Owning user's id.
    pub user_id: RecordId,
}

#[derive(Deserialize)]
struct AddressSchemaInput {
    #[serde(default)]
    id: Option<RecordId>,
    email: String,
    user_id: RecordId,
}

impl TryFrom<AddressSchemaInput> for AddressSchema {
    type Error = SchemaValidationError;

    fn try_from(input: AddressSchemaInput) -> Result<Self, Self::Error> {
        let schema = Self {
            id: input.id,
            email: input.email,
            user_id: input.user_id,
        };
        schema.validate()?;
        Ok(schema)
    }
}

impl AddressSchema {
    /// Creates an unsaved address schema.
    pub fn new(email: impl Into<String>, user_id: RecordId) -> Self {
        Self {
            id: None,
            email: email.into(),
            user_id,
        }
    }

    /// Builds the schema of a persisted address.
    pub fn from_entity(entity: Address) -> Result<Self, EntityStateError> {
        let id = entity.persisted_id()?;
        Ok(Self {
            id: Some(id),
            email: entity.email,
            user_id: entity.user_id,
        })
    }

    /// Checks field rules without touching storage.
    pub fn validate(&self) -> Result<(), SchemaValidationError> {
        check_id("id", self.id)?;
        check_id("user_id", Some(self.user_id))?;
        validate_email(&self.email)
    }

    /// Returns the id an update needs, or `MissingId`.
    pub fn require_id(&self) -> Result<RecordId, SchemaValidationError> {
        self.id.ok_or(SchemaValidationError::MissingId)
    }

    pub fn with_id(&self, id: RecordId) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }

    pub fn with_email(&self, email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..self.clone()
        }
    }
}

fn validate_email(email: &str) -> Result<(), SchemaValidationError> {
    if email.trim().is_empty() {
        return Err(SchemaValidationError::BlankEmail);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(SchemaValidationError::MalformedEmail);
    }

    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(SchemaValidationError::MalformedEmail),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_email, AddressSchema};
    use crate::schema::SchemaValidationError;

    #[test]
    fn email_shape_rules() {
        assert!(validate_email("ann@x.com").is_ok());
        assert_eq!(validate_email("  "), Err(SchemaValidationError::BlankEmail));
        assert_eq!(
            validate_email("ann.x.com"),
            Err(SchemaValidationError::MalformedEmail)
        );
        assert_eq!(
            validate_email("a@b@c"),
            Err(SchemaValidationError::MalformedEmail)
        );
        assert_eq!(
            validate_email("@x.com"),
            Err(SchemaValidationError::MalformedEmail)
        );
        assert_eq!(
            validate_email("ann @x.com"),
            Err(SchemaValidationError::MalformedEmail)
        );
    }

    #[test]
    fn validate_rejects_non_positive_user_id() {
        let err = AddressSchema::new("ann@x.com", 0).validate().unwrap_err();
        assert_eq!(
            err,
            SchemaValidationError::NonPositiveId {
                field: "user_id",
                value: 0
            }
        );
    }

    #[test]
    fn with_email_leaves_original_untouched() {
        let original = AddressSchema::new("ann@x.com", 1).with_id(3);
        let changed = original.with_email("ann@y.com");

        assert_eq!(original.email, "ann@x.com");
        assert_eq!(changed.email, "ann@y.com");
        assert_eq!(changed.id, Some(3));
        assert_eq!(changed.user_id, 1);
    }
}
