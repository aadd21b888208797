//! Persistence layer: event log and entity catalog storage.
//!
//! [`EventStore`] and [`EntityStore`] are the seams the service layer talks
//! to. [`postgres::PostgresStore`] backs both with `sqlx::PgPool`;
//! [`memory::MemoryStore`] backs both in process for tests and for running
//! with persistence disabled.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::ActivityConfig;
use crate::domain::{ActivityEvent, EntityKind, OwnedEntity, SubjectId, UserId};
use crate::error::ActivityError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Append-only storage for activity events.
#[async_trait]
pub trait EventStore: Send + Sync + fmt::Debug {
    /// Appends one event. There is no update or delete counterpart.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Persistence`] on storage failure.
    async fn append(&self, event: &ActivityEvent) -> Result<(), ActivityError>;

    /// Returns at most `limit` events whose subject id is one of
    /// `subject_ids`. No ordering is promised to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Persistence`] on storage failure.
    async fn find_by_subjects(
        &self,
        subject_ids: &[SubjectId],
        limit: usize,
    ) -> Result<Vec<ActivityEvent>, ActivityError>;
}

/// Storage for owned stores and services.
#[async_trait]
pub trait EntityStore: Send + Sync + fmt::Debug {
    /// Inserts a new entity.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidRequest`] if the id is taken, or
    /// [`ActivityError::Persistence`] on storage failure.
    async fn insert(&self, entity: &OwnedEntity) -> Result<(), ActivityError>;

    /// Fetches an entity by id.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Persistence`] on storage failure.
    async fn get(&self, id: &SubjectId) -> Result<Option<OwnedEntity>, ActivityError>;

    /// Overwrites an existing entity.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::EntityNotFound`] if it does not exist, or
    /// [`ActivityError::Persistence`] on storage failure.
    async fn update(&self, entity: &OwnedEntity) -> Result<(), ActivityError>;

    /// Deletes an entity, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Persistence`] on storage failure.
    async fn delete(&self, id: &SubjectId) -> Result<bool, ActivityError>;

    /// Lists a user's entities in creation order, optionally by kind.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Persistence`] on storage failure.
    async fn list_by_owner(
        &self,
        user_id: &UserId,
        kind: Option<EntityKind>,
    ) -> Result<Vec<OwnedEntity>, ActivityError>;
}

/// Opens the PostgreSQL pool and applies pending migrations.
///
/// # Errors
///
/// Returns [`ActivityError::Persistence`] if the connection or a migration
/// fails.
pub async fn connect(config: &ActivityConfig) -> Result<PgPool, ActivityError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
        .map_err(|e| ActivityError::Persistence(e.to_string()))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| ActivityError::Persistence(e.to_string()))?;

    tracing::info!(
        max_connections = config.database_max_connections,
        "database pool ready"
    );
    Ok(pool)
}
