//! Dashboard metrics handlers.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::SubjectQuery;
use crate::api::extract::CallerId;
use crate::app_state::AppState;
use crate::error::ErrorResponse;
use crate::service::MetricsSummary;
use crate::service::aggregator;

/// `GET /metrics`: Metrics over recent events for the given subjects the
/// caller owns.
///
/// # Errors
///
/// Returns `401` when the caller identity header is missing.
#[utoipa::path(
    get,
    path = "/api/v1/metrics",
    tag = "Metrics",
    summary = "Metrics for subjects",
    description = "Reads one page of recent events for the requested subject ids the caller owns (at most ten) and reduces it to dashboard metrics: counts by subject, location and action, device split, and the favorites-to-views conversion rate.",
    params(
        SubjectQuery,
        ("x-user-id" = String, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 200, description = "Metrics summary", body = MetricsSummary),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
    )
)]
pub async fn subject_metrics(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Query(query): Query<SubjectQuery>,
) -> Json<MetricsSummary> {
    let events = state.reader.recent_for_caller(&user_id, &query.ids()).await;
    Json(aggregator::summarize(&events, state.reader.page_size()))
}

/// `GET /me/metrics`: Metrics over the caller's own entities.
///
/// # Errors
///
/// Returns `401` when the caller identity header is missing.
#[utoipa::path(
    get,
    path = "/api/v1/me/metrics",
    tag = "Metrics",
    summary = "Metrics for my entities",
    description = "Same as /api/v1/metrics, over the stores and services the caller owns.",
    params(
        ("x-user-id" = String, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 200, description = "Metrics summary", body = MetricsSummary),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
    )
)]
pub async fn my_metrics(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
) -> Json<MetricsSummary> {
    let events = state.reader.recent_for_owner(&user_id).await;
    Json(aggregator::summarize(&events, state.reader.page_size()))
}

/// Metrics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(subject_metrics))
        .route("/me/metrics", get(my_metrics))
}
