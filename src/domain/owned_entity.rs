//! Owning entities: the stores and services a user manages.
//!
//! These are plain records. Beyond "has an id and a name" the only rule is
//! that `user_id` is taken from the authenticated caller on create and is
//! never rewritten by an update.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{SubjectId, UserId};
use crate::error::ActivityError;

/// Longest accepted entity name, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Kind of owned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A storefront.
    Store,
    /// A bookable service.
    Service,
}

impl EntityKind {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "store" => Ok(Self::Store),
            "service" => Ok(Self::Service),
            other => Err(ActivityError::InvalidEntityKind(other.to_string())),
        }
    }
}

/// A store or service owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OwnedEntity {
    /// Entity identifier, shared with the event subject id space.
    pub id: SubjectId,
    /// Store or service.
    pub kind: EntityKind,
    /// Display name.
    pub name: String,
    /// Owner.
    pub user_id: UserId,
    /// Free-form description.
    pub description: Option<String>,
    /// Marketplace category.
    pub category: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating an entity.
#[derive(Debug, Clone)]
pub struct NewEntity {
    /// Caller-chosen id; generated when absent.
    pub id: Option<SubjectId>,
    /// Store or service.
    pub kind: EntityKind,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Marketplace category.
    pub category: Option<String>,
}

/// Partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct EntityPatch {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
}

impl OwnedEntity {
    /// Builds a new entity owned by `owner`, stamped at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidRequest`] if the name is blank or too
    /// long.
    pub fn create(
        owner: UserId,
        input: NewEntity,
        now: DateTime<Utc>,
    ) -> Result<Self, ActivityError> {
        let name = validate_name(&input.name)?;
        Ok(Self {
            id: input.id.unwrap_or_else(SubjectId::generate),
            kind: input.kind,
            name,
            user_id: owner,
            description: input.description,
            category: input.category,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a patch in place. The owner is never changed.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidRequest`] if a new name is blank or
    /// too long.
    pub fn apply(&mut self, patch: EntityPatch, now: DateTime<Utc>) -> Result<(), ActivityError> {
        if let Some(name) = patch.name {
            self.name = validate_name(&name)?;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if patch.category.is_some() {
            self.category = patch.category;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Returns `true` if `user` owns this entity.
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.user_id == user
    }
}

fn validate_name(name: &str) -> Result<String, ActivityError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ActivityError::InvalidRequest("name must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ActivityError::InvalidRequest(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}
