//! Shared helpers for the router-level integration tests.
#![allow(dead_code, clippy::panic)]

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use storefront_activity::api;
use storefront_activity::app_state::AppState;
use storefront_activity::config::ActivityConfig;
use storefront_activity::domain::{ActivityEvent, FixedClock, SubjectId};
use storefront_activity::error::ActivityError;
use storefront_activity::geo::{DisabledGeoLocator, GeoLocator};
use storefront_activity::persistence::{EntityStore, EventStore, MemoryStore};

/// Header the fronting auth proxy sets.
pub const USER: &str = "x-user-id";

/// Fixed timestamp used across all integration tests.
pub fn fixed_now() -> DateTime<Utc> {
    let Some(now) = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).single() else {
        panic!("valid timestamp");
    };
    now
}

/// Geolocator that answers every lookup with the same place.
#[derive(Debug)]
pub struct FixedGeoLocator(pub &'static str);

#[async_trait]
impl GeoLocator for FixedGeoLocator {
    async fn locate(&self, _ip: IpAddr) -> Result<String, ActivityError> {
        Ok(self.0.to_string())
    }
}

/// Event store that refuses every write and read.
#[derive(Debug)]
pub struct BrokenEventStore;

#[async_trait]
impl EventStore for BrokenEventStore {
    async fn append(&self, _event: &ActivityEvent) -> Result<(), ActivityError> {
        Err(ActivityError::Persistence("disk full".to_string()))
    }

    async fn find_by_subjects(
        &self,
        _subject_ids: &[SubjectId],
        _limit: usize,
    ) -> Result<Vec<ActivityEvent>, ActivityError> {
        Err(ActivityError::Persistence("disk full".to_string()))
    }
}

/// Builds the app over an in-memory store with the given geolocator.
pub fn build_test_app_with(
    event_store: Arc<dyn EventStore>,
    geo: Arc<dyn GeoLocator>,
) -> Router {
    let entity_store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let state = AppState::new(
        event_store,
        entity_store,
        geo,
        Arc::new(FixedClock(fixed_now())),
        &ActivityConfig::default(),
    );
    api::build_app(state)
}

/// Builds the app over in-memory stores with geolocation disabled.
pub fn build_test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let event_store: Arc<dyn EventStore> = store;
    build_test_app_with(event_store, Arc::new(DisabledGeoLocator))
}

/// Sends one request and returns the status and JSON body (`Null` when the
/// body is empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let Ok(request) = builder.body(body) else {
        panic!("request should build");
    };

    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router is infallible");
    };
    let status = response.status();
    let Ok(collected) = response.into_body().collect().await else {
        panic!("body should be readable");
    };
    let bytes = collected.to_bytes();
    if bytes.is_empty() {
        return (status, serde_json::Value::Null);
    }
    let Ok(json) = serde_json::from_slice(&bytes) else {
        panic!("body is not JSON: {}", String::from_utf8_lossy(&bytes));
    };
    (status, json)
}

/// `POST /api/v1/events` for one subject.
pub async fn record(app: &Router, subject_id: &str, subject_name: &str, action: &str) -> StatusCode {
    let body = serde_json::json!({
        "action": action,
        "subject_id": subject_id,
        "subject_name": subject_name,
    });
    send(
        app,
        "POST",
        "/api/v1/events",
        &[("x-forwarded-for", "203.0.113.9")],
        Some(&body),
    )
    .await
    .0
}

/// `POST /api/v1/entities` as `user`, returning the status and body.
pub async fn create_entity(
    app: &Router,
    user: &str,
    id: &str,
    kind: &str,
) -> (StatusCode, serde_json::Value) {
    let body = serde_json::json!({ "id": id, "kind": kind, "name": format!("Entity {id}") });
    send(app, "POST", "/api/v1/entities", &[(USER, user)], Some(&body)).await
}
