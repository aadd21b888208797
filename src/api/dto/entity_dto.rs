//! Entity catalog DTOs for create, update, and list operations.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, default_page, default_per_page};
use crate::domain::{EntityKind, EntityPatch, NewEntity, OwnedEntity, SubjectId};
use crate::error::ActivityError;

/// Request body for `POST /api/v1/entities`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEntityRequest {
    /// Optional caller-chosen id. A UUID is generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// `"store"` or `"service"`.
    #[schema(example = "store")]
    pub kind: String,
    /// Display name, 1 to 200 characters.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Marketplace category.
    #[serde(default)]
    pub category: Option<String>,
}

impl TryFrom<CreateEntityRequest> for NewEntity {
    type Error = ActivityError;

    fn try_from(req: CreateEntityRequest) -> Result<Self, Self::Error> {
        let id = match req.id.as_deref().map(str::trim) {
            Some("") => {
                return Err(ActivityError::InvalidRequest(
                    "id must not be blank".to_string(),
                ));
            }
            Some(id) => Some(SubjectId::from(id)),
            None => None,
        };
        Ok(Self {
            id,
            kind: req.kind.parse()?,
            name: req.name,
            description: req.description,
            category: req.category,
        })
    }
}

/// Request body for `PATCH /api/v1/entities/{id}`. Absent fields are left
/// unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEntityRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New category.
    #[serde(default)]
    pub category: Option<String>,
}

impl From<UpdateEntityRequest> for EntityPatch {
    fn from(req: UpdateEntityRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            category: req.category,
        }
    }
}

/// Query parameters for `GET /api/v1/entities`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EntityListQuery {
    /// Only return entities of this kind (`store` or `service`).
    #[serde(default)]
    pub kind: Option<String>,
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl EntityListQuery {
    /// Parses the optional kind filter.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidEntityKind`] for an unknown kind.
    pub fn kind_filter(&self) -> Result<Option<EntityKind>, ActivityError> {
        self.kind.as_deref().map(str::parse::<EntityKind>).transpose()
    }
}

/// Paginated list response for `GET /api/v1/entities`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntityListResponse {
    /// Entities in creation order.
    pub data: Vec<OwnedEntity>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
