//! In-process store used in tests and when persistence is disabled.
//!
//! Events live in an append-only `Vec` behind a [`tokio::sync::RwLock`];
//! entities live in a `Vec` kept in creation order so owner listings come
//! back in the same order the PostgreSQL store returns them.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EntityStore, EventStore};
use crate::domain::{ActivityEvent, EntityKind, OwnedEntity, SubjectId, UserId};
use crate::error::ActivityError;

/// Memory-backed implementation of [`EventStore`] and [`EntityStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<ActivityEvent>>,
    entities: RwLock<Vec<OwnedEntity>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored events.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn append(&self, event: &ActivityEvent) -> Result<(), ActivityError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn find_by_subjects(
        &self,
        subject_ids: &[SubjectId],
        limit: usize,
    ) -> Result<Vec<ActivityEvent>, ActivityError> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .rev()
            .filter(|event| subject_ids.contains(&event.subject_id))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn insert(&self, entity: &OwnedEntity) -> Result<(), ActivityError> {
        let mut entities = self.entities.write().await;
        if entities.iter().any(|existing| existing.id == entity.id) {
            return Err(ActivityError::InvalidRequest(format!(
                "entity {} already exists",
                entity.id
            )));
        }
        entities.push(entity.clone());
        Ok(())
    }

    async fn get(&self, id: &SubjectId) -> Result<Option<OwnedEntity>, ActivityError> {
        let entities = self.entities.read().await;
        Ok(entities.iter().find(|entity| &entity.id == id).cloned())
    }

    async fn update(&self, entity: &OwnedEntity) -> Result<(), ActivityError> {
        let mut entities = self.entities.write().await;
        let slot = entities
            .iter_mut()
            .find(|existing| existing.id == entity.id)
            .ok_or_else(|| ActivityError::EntityNotFound(entity.id.to_string()))?;
        *slot = entity.clone();
        Ok(())
    }

    async fn delete(&self, id: &SubjectId) -> Result<bool, ActivityError> {
        let mut entities = self.entities.write().await;
        let before = entities.len();
        entities.retain(|entity| &entity.id != id);
        Ok(entities.len() < before)
    }

    async fn list_by_owner(
        &self,
        user_id: &UserId,
        kind: Option<EntityKind>,
    ) -> Result<Vec<OwnedEntity>, ActivityError> {
        let entities = self.entities.read().await;
        Ok(entities
            .iter()
            .filter(|entity| entity.is_owned_by(user_id))
            .filter(|entity| kind.is_none_or(|k| entity.kind == k))
            .cloned()
            .collect())
    }
}
