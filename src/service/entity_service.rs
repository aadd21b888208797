//! Entity catalog service: CRUD over owned stores and services.

use std::sync::Arc;

use crate::domain::{Clock, EntityKind, EntityPatch, NewEntity, OwnedEntity, SubjectId, UserId};
use crate::error::ActivityError;
use crate::persistence::{EntityStore, EventStore};

/// Create, read, update and delete for owned entities.
///
/// Ownership is checked here rather than trusted from the request: only
/// the owner may update or delete, and listings are always scoped to the
/// caller.
#[derive(Debug, Clone)]
pub struct EntityService {
    store: Arc<dyn EntityStore>,
    events: Arc<dyn EventStore>,
    clock: Arc<dyn Clock>,
}

impl EntityService {
    /// Creates a new `EntityService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn EntityStore>,
        events: Arc<dyn EventStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            events,
            clock,
        }
    }

    /// Creates an entity owned by `owner`.
    ///
    /// A caller-chosen id is refused when events are already recorded
    /// against it, so registering an id cannot claim someone else's history.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidRequest`] on a bad name, a taken id
    /// or an id with recorded activity, or a persistence error.
    pub async fn create(
        &self,
        owner: &UserId,
        input: NewEntity,
    ) -> Result<OwnedEntity, ActivityError> {
        if let Some(id) = &input.id {
            let history = self
                .events
                .find_by_subjects(std::slice::from_ref(id), 1)
                .await?;
            if !history.is_empty() {
                tracing::warn!(entity_id = %id, %owner, "id with recorded activity refused");
                return Err(ActivityError::InvalidRequest(format!(
                    "id {id} already has recorded activity"
                )));
            }
        }
        let entity = OwnedEntity::create(owner.clone(), input, self.clock.now())?;
        self.store.insert(&entity).await?;
        tracing::info!(entity_id = %entity.id, kind = %entity.kind, %owner, "entity created");
        Ok(entity)
    }

    /// Fetches an entity by id.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::EntityNotFound`] if no entity has that id.
    pub async fn get(&self, id: &SubjectId) -> Result<OwnedEntity, ActivityError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ActivityError::EntityNotFound(id.to_string()))
    }

    /// Lists the caller's entities in creation order.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the store fails.
    pub async fn list_for_owner(
        &self,
        owner: &UserId,
        kind: Option<EntityKind>,
    ) -> Result<Vec<OwnedEntity>, ActivityError> {
        self.store.list_by_owner(owner, kind).await
    }

    /// Applies a patch to an entity the caller owns.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::EntityNotFound`], [`ActivityError::Forbidden`]
    /// when the caller is not the owner, or [`ActivityError::InvalidRequest`]
    /// on a bad name.
    pub async fn update(
        &self,
        caller: &UserId,
        id: &SubjectId,
        patch: EntityPatch,
    ) -> Result<OwnedEntity, ActivityError> {
        let mut entity = self.owned_by(caller, id).await?;
        entity.apply(patch, self.clock.now())?;
        self.store.update(&entity).await?;
        tracing::info!(entity_id = %entity.id, "entity updated");
        Ok(entity)
    }

    /// Deletes an entity the caller owns. Its past events are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::EntityNotFound`] or
    /// [`ActivityError::Forbidden`].
    pub async fn delete(&self, caller: &UserId, id: &SubjectId) -> Result<(), ActivityError> {
        self.owned_by(caller, id).await?;
        if !self.store.delete(id).await? {
            return Err(ActivityError::EntityNotFound(id.to_string()));
        }
        tracing::info!(entity_id = %id, "entity deleted");
        Ok(())
    }

    async fn owned_by(
        &self,
        caller: &UserId,
        id: &SubjectId,
    ) -> Result<OwnedEntity, ActivityError> {
        let entity = self.get(id).await?;
        if !entity.is_owned_by(caller) {
            tracing::warn!(entity_id = %id, %caller, "ownership check failed");
            return Err(ActivityError::Forbidden(format!(
                "entity {id} is owned by another user"
            )));
        }
        Ok(entity)
    }
}
