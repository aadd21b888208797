//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{
    CreateEntityRequest, EntityListResponse, EventListResponse, PaginationMeta,
    RecordActivityRequest, StatusResponse, UpdateEntityRequest,
};
use super::handlers::{entities, events, metrics, system};
use crate::domain::{ActivityEvent, Device, EntityKind, EventId, OwnedEntity, SubjectId, UserId};
use crate::error::{ErrorBody, ErrorResponse};
use crate::service::{CountEntry, DeviceSplit, MetricsSummary};

/// Generated OpenAPI document, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "storefront-activity",
        description = "Activity recording and dashboard metrics for marketplace stores and services."
    ),
    paths(
        system::health_handler,
        events::record_event,
        events::list_events,
        events::my_events,
        metrics::subject_metrics,
        metrics::my_metrics,
        entities::create_entity,
        entities::list_entities,
        entities::get_entity,
        entities::update_entity,
        entities::delete_entity,
    ),
    components(schemas(
        system::HealthResponse,
        RecordActivityRequest,
        StatusResponse,
        EventListResponse,
        ActivityEvent,
        EventId,
        SubjectId,
        UserId,
        Device,
        MetricsSummary,
        CountEntry,
        DeviceSplit,
        CreateEntityRequest,
        UpdateEntityRequest,
        EntityListResponse,
        PaginationMeta,
        OwnedEntity,
        EntityKind,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Health"),
        (name = "Events", description = "Record and read activity events"),
        (name = "Metrics", description = "Dashboard metrics"),
        (name = "Entities", description = "Owned store and service catalog"),
    )
)]
pub struct ApiDoc;

/// `GET /api-docs/openapi.json` when the Swagger UI is compiled out.
#[cfg(not(feature = "swagger-ui"))]
pub async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
