//! Address repository over the `addresses` table.
//!
//! # Responsibility
//! - Persist addresses against an existing owning user.
//! - Load the ordered address snapshot embedded in `UserSchema`.
//!
//! # Invariants
//! - `email` is unique and `user_id` must reference a user; storage enforces
//!   both and violations surface as `RepoError::Constraint`.
//! - `user_id` is never rewritten after creation.
//! - Address lists are ordered by `id ASC` (insertion order).

use super::readiness::{ensure_table_ready, ADDRESSES_COLUMNS};
use super::repository::{RepoError, RepoResult, Repository};
use crate::db::{Gateway, Session, SessionMode};
use crate::model::address::Address;
use crate::model::RecordId;
use crate::schema::address::AddressSchema;
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::time::Instant;

const ADDRESS_SELECT_SQL: &str = "SELECT id, email, user_id FROM addresses";

/// SQLite-backed repository for `Address` / `AddressSchema`.
pub struct AddressRepository<'g> {
    gateway: &'g Gateway,
}

impl<'g> AddressRepository<'g> {
    /// Binds the repository to a gateway whose `addresses` table is present.
    pub fn try_new(gateway: &'g Gateway) -> RepoResult<Self> {
        ensure_table_ready(gateway.connection(), "addresses", ADDRESSES_COLUMNS)?;
        Ok(Self { gateway })
    }
}

impl Repository for AddressRepository<'_> {
    type Entity = Address;
    type Schema = AddressSchema;

    fn find_entity(&self, session: &Session<'_>, id: RecordId) -> RepoResult<Option<Address>> {
        find_address(session, id)
    }

    fn save(&self, schema: &AddressSchema) -> RepoResult<AddressSchema> {
        let started_at = Instant::now();
        schema.validate()?;

        let mut address = Address::from_schema(schema);
        let session = self.gateway.open_session(SessionMode::Write)?;
        if let Err(err) = session.execute(
            "INSERT INTO addresses (email, user_id) VALUES (?1, ?2);",
            params![address.email.as_str(), address.user_id],
        ) {
            let err = RepoError::from(err);
            warn!(
                "event=address_save module=repo status=error user_id={} error_code={} error={}",
                address.user_id,
                err.code(),
                err
            );
            return Err(err);
        }
        address.assign_id(session.last_insert_rowid())?;
        session.commit()?;

        let id = address.persisted_id()?;
        info!(
            "event=address_save module=repo status=ok id={} user_id={} duration_ms={}",
            id,
            address.user_id,
            started_at.elapsed().as_millis()
        );
        Ok(schema.with_id(id))
    }

    fn get(&self, id: RecordId) -> RepoResult<AddressSchema> {
        let started_at = Instant::now();
        let session = self.gateway.open_session(SessionMode::Read)?;
        let Some(address) = self.find_entity(&session, id)? else {
            warn!(
                "event=address_get module=repo status=not_found id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            );
            return Err(RepoError::NotFound {
                entity: Address::ENTITY,
                id,
            });
        };
        let schema = AddressSchema::from_entity(address)?;
        info!(
            "event=address_get module=repo status=ok id={} duration_ms={}",
            id,
            started_at.elapsed().as_millis()
        );
        Ok(schema)
    }

    fn update(&self, schema: &AddressSchema) -> RepoResult<AddressSchema> {
        let started_at = Instant::now();
        schema.validate()?;
        let id = schema.require_id()?;

        let session = self.gateway.open_session(SessionMode::Write)?;
        let changed = session.execute(
            "UPDATE addresses SET email = ?2 WHERE id = ?1;",
            params![id, schema.email.as_str()],
        )?;
        if changed == 0 {
            warn!("event=address_update module=repo status=not_found id={id}");
            return Err(RepoError::NotFound {
                entity: Address::ENTITY,
                id,
            });
        }

        let address = self
            .find_entity(&session, id)?
            .ok_or(RepoError::NotFound {
                entity: Address::ENTITY,
                id,
            })?;
        if address.user_id != schema.user_id {
            warn!(
                "event=address_update module=repo status=ignored_field id={} field=user_id",
                id
            );
        }
        let persisted = AddressSchema::from_entity(address)?;
        session.commit()?;

        info!(
            "event=address_update module=repo status=ok id={} duration_ms={}",
            id,
            started_at.elapsed().as_millis()
        );
        Ok(persisted)
    }
}

/// Loads every address owned by `user_id`, ordered by id.
pub(crate) fn list_addresses_for_user(
    conn: &Connection,
    user_id: RecordId,
) -> RepoResult<Vec<AddressSchema>> {
    let mut stmt = conn.prepare(&format!(
        "{ADDRESS_SELECT_SQL} WHERE user_id = ?1 ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([user_id])?;
    let mut addresses = Vec::new();
    while let Some(row) = rows.next()? {
        addresses.push(AddressSchema::from_entity(parse_address_row(row)?)?);
    }
    Ok(addresses)
}

fn find_address(conn: &Connection, id: RecordId) -> RepoResult<Option<Address>> {
    let address = conn
        .query_row(
            &format!("{ADDRESS_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_address_row,
        )
        .optional()?;
    Ok(address)
}

fn parse_address_row(row: &Row<'_>) -> rusqlite::Result<Address> {
    Ok(Address {
        id: Some(row.get("id")?),
        email: row.get("email")?,
        user_id: row.get("user_id")?,
    })
}
