//! User transfer schema.

use super::address::AddressSchema;
use super::{check_id, SchemaValidationError, MAX_AGE};
use crate::model::user::User;
use crate::model::{EntityStateError, RecordId};
use serde::{Deserialize, Serialize};

/// Storage-agnostic view of a user and a snapshot of its addresses.
///
/// `addresses` reflects storage at read time and is not refreshed. It is
/// informational on writes: saving or updating a user never touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserSchemaInput")]
pub struct UserSchema {
    /// `None` until the user has been saved.
    pub id: Option<RecordId>,
    pub name: String,
    pub age: i64,
    /// Ordered by address id.
    pub addresses: Vec<AddressSchema>,
}

#[derive(Deserialize)]
struct UserSchemaInput {
    #[serde(default)]
    id: Option<RecordId>,
    name: String,
    age: i64,
    #[serde(default)]
    addresses: Vec<AddressSchema>,
}

impl TryFrom<UserSchemaInput> for UserSchema {
    type Error = SchemaValidationError;

    fn try_from(input: UserSchemaInput) -> Result<Self, Self::Error> {
        let schema = Self {
            id: input.id,
            name: input.name,
            age: input.age,
            addresses: input.addresses,
        };
        schema.validate()?;
        Ok(schema)
    }
}

impl UserSchema {
    /// Creates an unsaved user schema with no addresses.
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            age,
            addresses: Vec::new(),
        }
    }

    /// Builds the schema of a persisted user with its address snapshot.
    pub fn from_entity(
        entity: User,
        addresses: Vec<AddressSchema>,
    ) -> Result<Self, EntityStateError> {
        let id = entity.persisted_id()?;
        Ok(Self {
            id: Some(id),
            name: entity.name,
            age: entity.age,
            addresses,
        })
    }

    /// Checks field rules, including every embedded address.
    pub fn validate(&self) -> Result<(), SchemaValidationError> {
        check_id("id", self.id)?;
        if self.name.trim().is_empty() {
            return Err(SchemaValidationError::BlankName);
        }
        if !(0..=MAX_AGE).contains(&self.age) {
            return Err(SchemaValidationError::AgeOutOfRange(self.age));
        }
        for (index, address) in self.addresses.iter().enumerate() {
            address
                .validate()
                .map_err(|reason| SchemaValidationError::InvalidAddress {
                    index,
                    reason: Box::new(reason),
                })?;
        }
        Ok(())
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

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn with_age(&self, age: i64) -> Self {
        Self {
            age,
            ..self.clone()
        }
    }

    pub fn with_addresses(&self, addresses: Vec<AddressSchema>) -> Self {
        Self {
            addresses,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UserSchema;
    use crate::model::user::User;
    use crate::model::EntityStateError;
    use crate::schema::address::AddressSchema;
    use crate::schema::SchemaValidationError;

    #[test]
    fn validate_checks_name_and_age() {
        assert!(UserSchema::new("Ann", 30).validate().is_ok());
        assert_eq!(
            UserSchema::new("   ", 30).validate(),
            Err(SchemaValidationError::BlankName)
        );
        assert_eq!(
            UserSchema::new("Ann", -1).validate(),
            Err(SchemaValidationError::AgeOutOfRange(-1))
        );
        assert_eq!(
            UserSchema::new("Ann", 151).validate(),
            Err(SchemaValidationError::AgeOutOfRange(151))
        );
    }

    #[test]
    fn validate_reports_bad_embedded_address_index() {
        let schema = UserSchema::new("Ann", 30).with_addresses(vec![
            AddressSchema::new("ann@x.com", 1),
            AddressSchema::new("broken", 1),
        ]);

        let err = schema.validate().unwrap_err();
        assert_eq!(
            err,
            SchemaValidationError::InvalidAddress {
                index: 1,
                reason: Box::new(SchemaValidationError::MalformedEmail),
            }
        );
    }

    #[test]
    fn from_entity_requires_persisted_id() {
        let unsaved = User::from_schema(&UserSchema::new("Ann", 30));
        let err = UserSchema::from_entity(unsaved, Vec::new()).unwrap_err();
        assert_eq!(err, EntityStateError::Unpersisted { entity: "user" });
    }

    #[test]
    fn copy_with_override_builds_new_values() {
        let original = UserSchema::new("Ann", 30);
        let saved = original.with_id(1);
        let renamed = saved.with_name("Anna").with_age(31);

        assert_eq!(original.id, None);
        assert_eq!(saved.id, Some(1));
        assert_eq!(saved.name, "Ann");
        assert_eq!(renamed.id, Some(1));
        assert_eq!(renamed.name, "Anna");
        assert_eq!(renamed.age, 31);
    }
}
