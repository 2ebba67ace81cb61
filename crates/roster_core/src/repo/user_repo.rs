//! User repository over the `users` table.
//!
//! # Responsibility
//! - Persist users and read them back with their address snapshot.
//!
//! # Invariants
//! - Saving or updating a user never creates or modifies addresses.
//! - `get` embeds addresses ordered by `id ASC`.

use super::address_repo::list_addresses_for_user;
use super::readiness::{ensure_table_ready, ADDRESSES_COLUMNS, USERS_COLUMNS};
use super::repository::{RepoError, RepoResult, Repository};
use crate::db::{Gateway, Session, SessionMode};
use crate::model::user::User;
use crate::model::RecordId;
use crate::schema::user::UserSchema;
use log::{info, warn};
use rusqlite::{params, OptionalExtension, Row};
use std::time::Instant;

/// SQLite-backed repository for `User` / `UserSchema`.
pub struct UserRepository<'g> {
    gateway: &'g Gateway,
}

impl<'g> UserRepository<'g> {
    /// Binds the repository to a gateway with `users` and `addresses` present.
    pub fn try_new(gateway: &'g Gateway) -> RepoResult<Self> {
        let conn = gateway.connection();
        ensure_table_ready(conn, "users", USERS_COLUMNS)?;
        ensure_table_ready(conn, "addresses", ADDRESSES_COLUMNS)?;
        Ok(Self { gateway })
    }
}

impl Repository for UserRepository<'_> {
    type Entity = User;
    type Schema = UserSchema;

    fn find_entity(&self, session: &Session<'_>, id: RecordId) -> RepoResult<Option<User>> {
        let user = session
            .query_row(
                "SELECT id, name, age FROM users WHERE id = ?1;",
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Persists `name` and `age`.
    ///
    /// The returned schema has an empty address list: a freshly created user
    /// owns no addresses, whatever the input carried.
    fn save(&self, schema: &UserSchema) -> RepoResult<UserSchema> {
        let started_at = Instant::now();
        schema.validate()?;

        let mut user = User::from_schema(schema);
        let session = self.gateway.open_session(SessionMode::Write)?;
        if let Err(err) = session.execute(
            "INSERT INTO users (name, age) VALUES (?1, ?2);",
            params![user.name.as_str(), user.age],
        ) {
            let err = RepoError::from(err);
            warn!(
                "event=user_save module=repo status=error error_code={} error={}",
                err.code(),
                err
            );
            return Err(err);
        }
        user.assign_id(session.last_insert_rowid())?;
        session.commit()?;

        let id = user.persisted_id()?;
        info!(
            "event=user_save module=repo status=ok id={} duration_ms={}",
            id,
            started_at.elapsed().as_millis()
        );
        Ok(schema.with_id(id).with_addresses(Vec::new()))
    }

    fn get(&self, id: RecordId) -> RepoResult<UserSchema> {
        let started_at = Instant::now();
        let session = self.gateway.open_session(SessionMode::Read)?;
        match self.load_schema(&session, id) {
            Ok(schema) => {
                info!(
                    "event=user_get module=repo status=ok id={} addresses={} duration_ms={}",
                    id,
                    schema.addresses.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(schema)
            }
            Err(err) => {
                warn!(
                    "event=user_get module=repo status={} id={} duration_ms={}",
                    err.code(),
                    id,
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    /// Overwrites `name` and `age`; the address collection is left alone.
    fn update(&self, schema: &UserSchema) -> RepoResult<UserSchema> {
        let started_at = Instant::now();
        schema.validate()?;
        let id = schema.require_id()?;

        let session = self.gateway.open_session(SessionMode::Write)?;
        let changed = session.execute(
            "UPDATE users SET name = ?2, age = ?3 WHERE id = ?1;",
            params![id, schema.name.as_str(), schema.age],
        )?;
        if changed == 0 {
            warn!("event=user_update module=repo status=not_found id={id}");
            return Err(RepoError::NotFound {
                entity: User::ENTITY,
                id,
            });
        }

        let persisted = self.load_schema(&session, id)?;
        session.commit()?;

        info!(
            "event=user_update module=repo status=ok id={} addresses={} duration_ms={}",
            id,
            persisted.addresses.len(),
            started_at.elapsed().as_millis()
        );
        Ok(persisted)
    }
}

impl UserRepository<'_> {
    fn load_schema(&self, session: &Session<'_>, id: RecordId) -> RepoResult<UserSchema> {
        let user = self.find_entity(session, id)?.ok_or(RepoError::NotFound {
            entity: User::ENTITY,
            id,
        })?;
        let addresses = list_addresses_for_user(session, id)?;
        Ok(UserSchema::from_entity(user, addresses)?)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        age: row.get("age")?,
    })
}

