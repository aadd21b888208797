//! PostgreSQL implementation of the persistence layer.

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{EntityRow, EventRow};
use super::{EntityStore, EventStore};
use crate::domain::{ActivityEvent, EntityKind, OwnedEntity, SubjectId, UserId};
use crate::error::ActivityError;

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence(e: sqlx::Error) -> ActivityError {
    ActivityError::Persistence(e.to_string())
}

#[async_trait]
impl EventStore for PostgresStore {
    async fn append(&self, event: &ActivityEvent) -> Result<(), ActivityError> {
        sqlx::query(
            "INSERT INTO events \
             (id, action, subject_id, subject_name, details, value, event_type, location, device, extra, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(event.id.as_uuid())
        .bind(event.action.as_str())
        .bind(event.subject_id.as_str())
        .bind(&event.subject_name)
        .bind(&event.details)
        .bind(event.value)
        .bind(event.event_type.as_str())
        .bind(&event.location)
        .bind(event.device.as_str())
        .bind(&event.extra)
        .bind(event.timestamp)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(())
    }

    async fn find_by_subjects(
        &self,
        subject_ids: &[SubjectId],
        limit: usize,
    ) -> Result<Vec<ActivityEvent>, ActivityError> {
        let ids: Vec<String> = subject_ids.iter().cloned().map(SubjectId::into_inner).collect();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT id, action, subject_id, subject_name, details, value, event_type, location, device, extra, created_at \
             FROM events WHERE subject_id = ANY($1) ORDER BY created_at DESC LIMIT $2",
        )
        .bind(ids)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(rows.into_iter().map(ActivityEvent::from).collect())
    }
}

#[async_trait]
impl EntityStore for PostgresStore {
    async fn insert(&self, entity: &OwnedEntity) -> Result<(), ActivityError> {
        sqlx::query(
            "INSERT INTO entities (id, kind, name, user_id, description, category, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(entity.id.as_str())
        .bind(entity.kind.as_str())
        .bind(&entity.name)
        .bind(entity.user_id.as_str())
        .bind(&entity.description)
        .bind(&entity.category)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ActivityError::InvalidRequest(format!("entity {} already exists", entity.id))
            }
            other => persistence(other),
        })?;

        Ok(())
    }

    async fn get(&self, id: &SubjectId) -> Result<Option<OwnedEntity>, ActivityError> {
        let row = sqlx::query_as::<_, EntityRow>(
            "SELECT id, kind, name, user_id, description, category, created_at, updated_at \
             FROM entities WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence)?;

        row.map(OwnedEntity::try_from).transpose()
    }

    async fn update(&self, entity: &OwnedEntity) -> Result<(), ActivityError> {
        let result = sqlx::query(
            "UPDATE entities SET name = $2, description = $3, category = $4, updated_at = $5 \
             WHERE id = $1",
        )
        .bind(entity.id.as_str())
        .bind(&entity.name)
        .bind(&entity.description)
        .bind(&entity.category)
        .bind(entity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        if result.rows_affected() == 0 {
            return Err(ActivityError::EntityNotFound(entity.id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &SubjectId) -> Result<bool, ActivityError> {
        let result = sqlx::query("DELETE FROM entities WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(
        &self,
        user_id: &UserId,
        kind: Option<EntityKind>,
    ) -> Result<Vec<OwnedEntity>, ActivityError> {
        let rows = if let Some(kind) = kind {
            sqlx::query_as::<_, EntityRow>(
                "SELECT id, kind, name, user_id, description, category, created_at, updated_at \
                 FROM entities WHERE user_id = $1 AND kind = $2 ORDER BY created_at ASC, id ASC",
            )
            .bind(user_id.as_str())
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, EntityRow>(
                "SELECT id, kind, name, user_id, description, category, created_at, updated_at \
                 FROM entities WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
            )
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
        }
        .map_err(persistence)?;

        rows.into_iter().map(OwnedEntity::try_from).collect()
    }
}
