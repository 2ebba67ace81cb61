//! Repository layer: the save/get/update contract and its SQLite bindings.
//!
//! # Responsibility
//! - Define one storage-agnostic contract over entity/schema pairs.
//! - Translate between persisted rows and validated transfer schemas.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Writes validate the schema before opening a session.
//! - Each operation opens exactly one session and commits at most once.
//! - Missing rows surface as `NotFound`, never as an empty schema.
//! - Storage errors propagate unchanged; nothing is retried.

pub mod address_repo;
mod readiness;
pub mod repository;
pub mod user_repo;
