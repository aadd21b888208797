//! Entity catalog handlers: create, list, get, update, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    CreateEntityRequest, EntityListQuery, EntityListResponse, UpdateEntityRequest, paginate,
};
use crate::api::extract::CallerId;
use crate::app_state::AppState;
use crate::domain::{NewEntity, OwnedEntity, SubjectId};
use crate::error::{ActivityError, ErrorResponse};

/// `POST /entities`: Create a store or service owned by the caller.
///
/// # Errors
///
/// Returns [`ActivityError`] on a bad kind or name, a taken id, or a
/// storage failure.
#[utoipa::path(
    post,
    path = "/api/v1/entities",
    tag = "Entities",
    summary = "Create an entity",
    description = "Creates a store or service owned by the caller. The id is generated unless supplied.",
    params(
        ("x-user-id" = String, Header, description = "Authenticated user id"),
    ),
    request_body = CreateEntityRequest,
    responses(
        (status = 201, description = "Entity created", body = OwnedEntity),
        (status = 400, description = "Invalid kind, name, or id", body = ErrorResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
    )
)]
pub async fn create_entity(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Json(req): Json<CreateEntityRequest>,
) -> Result<impl IntoResponse, ActivityError> {
    let input = NewEntity::try_from(req)?;
    let entity = state.entities.create(&user_id, input).await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

/// `GET /entities`: List the caller's entities.
///
/// # Errors
///
/// Returns [`ActivityError::InvalidEntityKind`] for an unknown kind filter.
#[utoipa::path(
    get,
    path = "/api/v1/entities",
    tag = "Entities",
    summary = "List my entities",
    description = "Returns the caller's stores and services in creation order, optionally filtered by kind.",
    params(
        ("x-user-id" = String, Header, description = "Authenticated user id"),
        EntityListQuery,
    ),
    responses(
        (status = 200, description = "Paginated entity list", body = EntityListResponse),
        (status = 400, description = "Unknown kind", body = ErrorResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
    )
)]
pub async fn list_entities(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Query(query): Query<EntityListQuery>,
) -> Result<impl IntoResponse, ActivityError> {
    let kind = query.kind_filter()?;
    let owned = state.entities.list_for_owner(&user_id, kind).await?;
    let (data, pagination) = paginate(owned, query.page, query.per_page);
    Ok(Json(EntityListResponse { data, pagination }))
}

/// `GET /entities/{id}`: Fetch one entity.
///
/// # Errors
///
/// Returns [`ActivityError::EntityNotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/entities/{id}",
    tag = "Entities",
    summary = "Get an entity",
    description = "Returns a single store or service. Any authenticated caller may read it.",
    params(
        ("id" = String, Path, description = "Entity id"),
        ("x-user-id" = String, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 200, description = "Entity", body = OwnedEntity),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
        (status = 404, description = "Entity not found", body = ErrorResponse),
    )
)]
pub async fn get_entity(
    State(state): State<AppState>,
    CallerId(_caller): CallerId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ActivityError> {
    let entity = state.entities.get(&SubjectId::from(id)).await?;
    Ok(Json(entity))
}

/// `PATCH /entities/{id}`: Update an entity the caller owns.
///
/// # Errors
///
/// Returns [`ActivityError::Forbidden`] for a non-owner,
/// [`ActivityError::EntityNotFound`] for an unknown id, or
/// [`ActivityError::InvalidRequest`] on a bad name.
#[utoipa::path(
    patch,
    path = "/api/v1/entities/{id}",
    tag = "Entities",
    summary = "Update an entity",
    description = "Applies a partial update. Only the owner may update.",
    params(
        ("id" = String, Path, description = "Entity id"),
        ("x-user-id" = String, Header, description = "Authenticated user id"),
    ),
    request_body = UpdateEntityRequest,
    responses(
        (status = 200, description = "Updated entity", body = OwnedEntity),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
        (status = 404, description = "Entity not found", body = ErrorResponse),
    )
)]
pub async fn update_entity(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Path(id): Path<String>,
    Json(req): Json<UpdateEntityRequest>,
) -> Result<impl IntoResponse, ActivityError> {
    let entity = state
        .entities
        .update(&user_id, &SubjectId::from(id), req.into())
        .await?;
    Ok(Json(entity))
}

/// `DELETE /entities/{id}`: Delete an entity the caller owns.
///
/// Past events for the entity are kept.
///
/// # Errors
///
/// Returns [`ActivityError::Forbidden`] for a non-owner or
/// [`ActivityError::EntityNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/entities/{id}",
    tag = "Entities",
    summary = "Delete an entity",
    description = "Removes a store or service from the catalog. Only the owner may delete. Recorded events are not touched.",
    params(
        ("id" = String, Path, description = "Entity id"),
        ("x-user-id" = String, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 204, description = "Entity deleted"),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
        (status = 404, description = "Entity not found", body = ErrorResponse),
    )
)]
pub async fn delete_entity(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ActivityError> {
    state
        .entities
        .delete(&user_id, &SubjectId::from(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Entity routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entities", get(list_entities).post(create_entity))
        .route(
            "/entities/{id}",
            get(get_entity).patch(update_entity).delete(delete_entity),
        )
}
