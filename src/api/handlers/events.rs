//! Event handlers: record activity and read it back.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{EventListResponse, RecordActivityRequest, StatusResponse, SubjectQuery};
use crate::api::extract::CallerId;
use crate::app_state::AppState;
use crate::domain::ClientContext;
use crate::error::ErrorResponse;

/// `POST /events`: Record one activity event.
///
/// Always answers `202 Accepted` for a well-formed body. Geolocation and
/// storage failures are logged server-side and never reach the caller.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Record an activity event",
    description = "Records a view, favorite, review, or other action against a store or service. The client location is resolved from the request IP and the device class from the User-Agent. Recording is best-effort: the response is 202 whether or not the event was persisted.",
    request_body = RecordActivityRequest,
    responses(
        (status = 202, description = "Event accepted", body = StatusResponse),
    )
)]
pub async fn record_event(
    State(state): State<AppState>,
    client: ClientContext,
    Json(req): Json<RecordActivityRequest>,
) -> impl IntoResponse {
    state.recorder.record(req.into(), &client).await;
    (
        StatusCode::ACCEPTED,
        Json(StatusResponse {
            status: "accepted".to_string(),
        }),
    )
}

/// `GET /events`: Recent events for the given subject ids the caller owns.
///
/// # Errors
///
/// Returns `401` when the caller identity header is missing.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List recent events for subjects",
    description = "Returns up to one page of events, newest first, for the requested subject ids. Ids the caller does not own are dropped before the ten-id cap applies. Read failures yield an empty list.",
    params(
        SubjectQuery,
        ("x-user-id" = String, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 200, description = "Recent events", body = EventListResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Query(query): Query<SubjectQuery>,
) -> impl IntoResponse {
    let events = state.reader.recent_for_caller(&user_id, &query.ids()).await;
    Json(EventListResponse::new(events, state.reader.page_size()))
}

/// `GET /me/events`: Recent events for the caller's own entities.
///
/// # Errors
///
/// Returns `401` when the caller identity header is missing.
#[utoipa::path(
    get,
    path = "/api/v1/me/events",
    tag = "Events",
    summary = "List recent events for my entities",
    description = "Resolves the caller's stores and services from the catalog and returns their recent events, newest first.",
    params(
        ("x-user-id" = String, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 200, description = "Recent events", body = EventListResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
    )
)]
pub async fn my_events(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
) -> impl IntoResponse {
    let events = state.reader.recent_for_owner(&user_id).await;
    Json(EventListResponse::new(events, state.reader.page_size()))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(record_event))
        .route("/me/events", get(my_events))
}
