//! Router-level tests for the REST surface.
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{
    BrokenEventStore, FixedGeoLocator, USER, build_test_app, build_test_app_with, create_entity,
    record, send,
};
use storefront_activity::persistence::{EventStore, MemoryStore};

fn by_label(entries: &Value, label: &str) -> Option<u64> {
    entries
        .as_array()?
        .iter()
        .find(|e| e.get("label").and_then(Value::as_str) == Some(label))?
        .get("count")?
        .as_u64()
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = build_test_app();
    let (status, body) = send(&app, "GET", "/health", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status"), Some(&json!("healthy")));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = build_test_app();
    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.pointer("/paths/~1api~1v1~1events").is_some());
}

#[tokio::test]
async fn recorded_event_is_enriched() {
    let store = Arc::new(MemoryStore::new());
    let event_store: Arc<dyn EventStore> = Arc::clone(&store) as Arc<dyn EventStore>;
    let app = build_test_app_with(event_store, Arc::new(FixedGeoLocator("Nairobi, Kenya")));
    create_entity(&app, "u1", "store-1", "store").await;

    let body = json!({
        "action": "Favorite",
        "subject_id": "store-1",
        "subject_name": "Bloom",
        "details": "Added Bloom to favorites",
        "event_type": "Favorite",
    });
    let (status, ack) = send(
        &app,
        "POST",
        "/api/v1/events",
        &[
            ("x-forwarded-for", "203.0.113.9"),
            ("user-agent", "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)"),
        ],
        Some(&body),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(ack.get("status"), Some(&json!("accepted")));
    assert_eq!(store.event_count().await, 1);

    let (status, page) = send(
        &app,
        "GET",
        "/api/v1/events?subject_ids=store-1",
        &[(USER, "u1")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.get("count"), Some(&json!(1)));
    assert_eq!(page.pointer("/data/0/location"), Some(&json!("Nairobi, Kenya")));
    assert_eq!(page.pointer("/data/0/device"), Some(&json!("Mobile")));
    assert_eq!(page.pointer("/data/0/action"), Some(&json!("Favorite")));
}

#[tokio::test]
async fn failed_lookup_writes_placeholder_location() {
    let app = build_test_app();
    create_entity(&app, "u1", "store-1", "store").await;
    assert_eq!(record(&app, "store-1", "Bloom", "View").await, StatusCode::ACCEPTED);

    let (_, page) = send(
        &app,
        "GET",
        "/api/v1/events?subject_ids=store-1",
        &[(USER, "u1")],
        None,
    )
    .await;
    assert_eq!(page.pointer("/data/0/location"), Some(&json!("Unknown Location")));
    assert_eq!(page.pointer("/data/0/device"), Some(&json!("Desktop")));
}

#[tokio::test]
async fn recording_is_accepted_even_when_storage_fails() {
    let app = build_test_app_with(
        Arc::new(BrokenEventStore),
        Arc::new(FixedGeoLocator("Lagos, Nigeria")),
    );
    let body = json!({ "kind": "store", "name": "Bloom" });
    let (status, created) =
        send(&app, "POST", "/api/v1/entities", &[(USER, "u1")], Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(id) = created.get("id").and_then(Value::as_str) else {
        panic!("missing id: {created}");
    };
    assert_eq!(record(&app, id, "Bloom", "View").await, StatusCode::ACCEPTED);

    let uri = format!("/api/v1/events?subject_ids={id}");
    let (status, page) = send(&app, "GET", &uri, &[(USER, "u1")], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.get("count"), Some(&json!(0)));
}

#[tokio::test]
async fn owner_metrics_scenario() {
    let app = build_test_app();
    for id in ["a", "b"] {
        let (status, _) = create_entity(&app, "u1", id, "store").await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = create_entity(&app, "u2", "z", "service").await;
    assert_eq!(status, StatusCode::CREATED);

    record(&app, "a", "Store A", "View").await;
    record(&app, "b", "Store B", "Favorite").await;
    record(&app, "a", "Store A", "View").await;
    record(&app, "z", "Someone Else", "View").await;

    let (status, metrics) = send(&app, "GET", "/api/v1/me/metrics", &[(USER, "u1")], None).await;
    assert_eq!(status, StatusCode::OK);
    let Some(by_subject) = metrics.get("by_subject") else {
        panic!("missing by_subject: {metrics}");
    };
    assert_eq!(by_label(by_subject, "Store A"), Some(2));
    assert_eq!(by_label(by_subject, "Store B"), Some(1));
    assert_eq!(by_label(by_subject, "Someone Else"), None);
    assert_eq!(metrics.get("conversion_rate"), Some(&json!("50.0%")));
    assert_eq!(metrics.get("sample_size"), Some(&json!(3)));
    assert_eq!(metrics.get("truncated"), Some(&json!(false)));

    let (status, events) = send(&app, "GET", "/api/v1/me/events", &[(USER, "u1")], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.get("count"), Some(&json!(3)));
}

#[tokio::test]
async fn subject_metrics_by_query() {
    let app = build_test_app();
    create_entity(&app, "u1", "a", "store").await;
    create_entity(&app, "u1", "b", "store").await;
    record(&app, "a", "Store A", "View").await;
    record(&app, "b", "Store B", "Favorite").await;
    record(&app, "a", "Store A", "View").await;

    let (status, metrics) = send(
        &app,
        "GET",
        "/api/v1/metrics?subject_ids=a,b",
        &[(USER, "u1")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics.get("views"), Some(&json!(2)));
    assert_eq!(metrics.get("favorites"), Some(&json!(1)));
    assert_eq!(metrics.get("conversion_rate"), Some(&json!("50.0%")));
}

#[tokio::test]
async fn only_first_ten_subject_ids_are_read() {
    let app = build_test_app();
    let ids: Vec<String> = (1..=11).map(|i| format!("s{i}")).collect();
    for id in &ids {
        create_entity(&app, "u1", id, "store").await;
        record(&app, id, id, "View").await;
    }

    let uri = format!("/api/v1/events?subject_ids={}", ids.join(","));
    let (status, page) = send(&app, "GET", &uri, &[(USER, "u1")], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.get("count"), Some(&json!(10)));
    let Some(data) = page.get("data").and_then(Value::as_array) else {
        panic!("missing data");
    };
    assert!(
        data.iter()
            .all(|e| e.get("subject_id") != Some(&json!("s11")))
    );
}

#[tokio::test]
async fn empty_subject_list_yields_empty_page() {
    let app = build_test_app();
    create_entity(&app, "u1", "a", "store").await;
    record(&app, "a", "Store A", "View").await;
    let (status, page) = send(&app, "GET", "/api/v1/events", &[(USER, "u1")], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.get("count"), Some(&json!(0)));

    let (_, metrics) = send(&app, "GET", "/api/v1/metrics", &[(USER, "u1")], None).await;
    assert_eq!(metrics.get("conversion_rate"), Some(&json!("0.0%")));
}

#[tokio::test]
async fn subject_reads_only_cover_owned_subjects() {
    let app = build_test_app();
    create_entity(&app, "u1", "a", "store").await;
    create_entity(&app, "u2", "z", "store").await;
    record(&app, "a", "Store A", "View").await;
    record(&app, "a", "Store A", "Favorite").await;
    record(&app, "z", "Store Z", "View").await;

    let (status, metrics) = send(
        &app,
        "GET",
        "/api/v1/metrics?subject_ids=a",
        &[(USER, "u2")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics.get("views"), Some(&json!(0)));
    assert_eq!(metrics.get("favorites"), Some(&json!(0)));
    assert_eq!(metrics.get("sample_size"), Some(&json!(0)));

    let (status, page) = send(
        &app,
        "GET",
        "/api/v1/events?subject_ids=a,z",
        &[(USER, "u2")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.get("count"), Some(&json!(1)));
    assert_eq!(page.pointer("/data/0/subject_id"), Some(&json!("z")));

    for uri in ["/api/v1/events?subject_ids=a", "/api/v1/metrics?subject_ids=a"] {
        let (status, body) = send(&app, "GET", uri, &[], None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body.pointer("/error/code"), Some(&json!(2003)));
    }
}

#[tokio::test]
async fn unowned_ids_do_not_crowd_out_owned_ones() {
    let app = build_test_app();
    let mut ids: Vec<String> = (1..=10).map(|i| format!("other{i}")).collect();
    for id in &ids {
        create_entity(&app, "u2", id, "store").await;
        record(&app, id, id, "View").await;
    }
    create_entity(&app, "u1", "mine", "store").await;
    record(&app, "mine", "Mine", "View").await;
    ids.push("mine".to_string());

    let uri = format!("/api/v1/events?subject_ids={}", ids.join(","));
    let (status, page) = send(&app, "GET", &uri, &[(USER, "u1")], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.get("count"), Some(&json!(1)));
    assert_eq!(page.pointer("/data/0/subject_id"), Some(&json!("mine")));
}

#[tokio::test]
async fn deleted_subject_history_cannot_be_claimed() {
    let app = build_test_app();
    create_entity(&app, "u1", "a", "store").await;
    record(&app, "a", "Store A", "View").await;
    let (status, _) = send(&app, "DELETE", "/api/v1/entities/a", &[(USER, "u1")], None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = create_entity(&app, "u2", "a", "store").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.pointer("/error/code"), Some(&json!(1001)));

    record(&app, "orphan", "Never Registered", "View").await;
    let (status, _) = create_entity(&app, "u2", "orphan", "store").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn me_routes_require_identity() {
    let app = build_test_app();
    for uri in ["/api/v1/me/events", "/api/v1/me/metrics", "/api/v1/entities"] {
        let (status, body) = send(&app, "GET", uri, &[], None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body.pointer("/error/code"), Some(&json!(2003)));
    }
}

#[tokio::test]
async fn entity_lifecycle_enforces_ownership() {
    let app = build_test_app();
    let (status, created) = create_entity(&app, "u1", "svc-1", "service").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.get("user_id"), Some(&json!("u1")));
    assert_eq!(created.get("kind"), Some(&json!("service")));

    let patch = json!({ "name": "Hijacked" });
    let (status, body) = send(
        &app,
        "PATCH",
        "/api/v1/entities/svc-1",
        &[(USER, "u2")],
        Some(&patch),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body.pointer("/error/code"), Some(&json!(2002)));

    let (status, _) = send(&app, "DELETE", "/api/v1/entities/svc-1", &[(USER, "u2")], None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let patch = json!({ "name": "Green Thumb", "category": "gardening" });
    let (status, updated) = send(
        &app,
        "PATCH",
        "/api/v1/entities/svc-1",
        &[(USER, "u1")],
        Some(&patch),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated.get("name"), Some(&json!("Green Thumb")));
    assert_eq!(updated.get("category"), Some(&json!("gardening")));

    let (status, fetched) = send(&app, "GET", "/api/v1/entities/svc-1", &[(USER, "u2")], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched.get("name"), Some(&json!("Green Thumb")));

    let (status, body) = send(&app, "DELETE", "/api/v1/entities/svc-1", &[(USER, "u1")], None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", "/api/v1/entities/svc-1", &[(USER, "u1")], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.pointer("/error/code"), Some(&json!(2001)));
}

#[tokio::test]
async fn entity_validation_errors() {
    let app = build_test_app();
    let (status, body) = create_entity(&app, "u1", "x", "warehouse").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.pointer("/error/code"), Some(&json!(1002)));

    let blank = json!({ "kind": "store", "name": "   " });
    let (status, body) = send(&app, "POST", "/api/v1/entities", &[(USER, "u1")], Some(&blank)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.pointer("/error/code"), Some(&json!(1001)));

    let (status, _) = create_entity(&app, "u1", "dup", "store").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = create_entity(&app, "u2", "dup", "store").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn entity_list_filters_and_pages() {
    let app = build_test_app();
    for (id, kind) in [("s1", "store"), ("v1", "service"), ("s2", "store"), ("s3", "store")] {
        create_entity(&app, "u1", id, kind).await;
    }
    create_entity(&app, "u2", "other", "store").await;

    let (status, list) = send(
        &app,
        "GET",
        "/api/v1/entities?kind=store&page=1&per_page=2",
        &[(USER, "u1")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.pointer("/pagination/total"), Some(&json!(3)));
    assert_eq!(list.pointer("/pagination/total_pages"), Some(&json!(2)));
    assert_eq!(list.pointer("/data/0/id"), Some(&json!("s1")));
    assert_eq!(list.pointer("/data/1/id"), Some(&json!("s2")));

    let (status, body) = send(&app, "GET", "/api/v1/entities?kind=shop", &[(USER, "u1")], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.pointer("/error/code"), Some(&json!(1002)));
}
