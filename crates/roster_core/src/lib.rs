//! Data-access core for users and their addresses.
//! Repositories here are the single translation point between SQLite rows
//! and the validated schemas callers exchange.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;

pub use db::{Gateway, Session, SessionMode, StorageConfig, StorageLocation};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status, LogSettings};
pub use model::address::Address;
pub use model::user::User;
pub use model::{EntityStateError, RecordId};
pub use repo::address_repo::AddressRepository;
pub use repo::repository::{ConstraintKind, RepoError, RepoResult, Repository};
pub use repo::user_repo::UserRepository;
pub use schema::address::AddressSchema;
pub use schema::user::UserSchema;
pub use schema::SchemaValidationError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
