//! Test doubles shared by the unit tests.

use std::net::IpAddr;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    Action, ActivityEvent, Device, EntityKind, EventId, EventType, OwnedEntity, SubjectId,
    UNKNOWN_LOCATION, UserId,
};
use crate::error::ActivityError;
use crate::geo::GeoLocator;
use crate::persistence::{EntityStore, EventStore, MemoryStore};

/// 2026-01-15T10:00:00Z plus `secs`.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0)
        .single()
        .map(|base| base + chrono::Duration::seconds(secs))
        .unwrap_or_default()
}

/// Builds an event for `subject` with the given action at `at(secs)`.
pub fn event(subject: &str, action: Action, secs: i64) -> ActivityEvent {
    ActivityEvent {
        id: EventId::new(),
        action,
        subject_id: SubjectId::from(subject),
        subject_name: subject.to_string(),
        details: String::new(),
        value: None,
        event_type: EventType::General,
        location: UNKNOWN_LOCATION.to_string(),
        device: Device::Desktop,
        extra: serde_json::json!({}),
        timestamp: at(secs),
    }
}

/// Geolocator that always answers with the same location.
#[derive(Debug)]
pub struct StaticGeoLocator(pub &'static str);

#[async_trait]
impl GeoLocator for StaticGeoLocator {
    async fn locate(&self, _ip: IpAddr) -> Result<String, ActivityError> {
        Ok(self.0.to_string())
    }
}

/// Event store that records the subject ids of every query and answers
/// from an inner [`MemoryStore`].
#[derive(Debug, Default)]
pub struct RecordingEventStore {
    inner: MemoryStore,
    queries: Mutex<Vec<(Vec<SubjectId>, usize)>>,
}

impl RecordingEventStore {
    /// Snapshot of `(subject_ids, limit)` per query.
    pub fn queries(&self) -> Vec<(Vec<SubjectId>, usize)> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EventStore for RecordingEventStore {
    async fn append(&self, event: &ActivityEvent) -> Result<(), ActivityError> {
        self.inner.append(event).await
    }

    async fn find_by_subjects(
        &self,
        subject_ids: &[SubjectId],
        limit: usize,
    ) -> Result<Vec<ActivityEvent>, ActivityError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((subject_ids.to_vec(), limit));
        }
        self.inner.find_by_subjects(subject_ids, limit).await
    }
}

/// Store whose every operation fails with a persistence error.
#[derive(Debug, Default)]
pub struct FailingStore;

fn refused() -> ActivityError {
    ActivityError::Persistence("connection refused".to_string())
}

#[async_trait]
impl EventStore for FailingStore {
    async fn append(&self, _event: &ActivityEvent) -> Result<(), ActivityError> {
        Err(refused())
    }

    async fn find_by_subjects(
        &self,
        _subject_ids: &[SubjectId],
        _limit: usize,
    ) -> Result<Vec<ActivityEvent>, ActivityError> {
        Err(refused())
    }
}

#[async_trait]
impl EntityStore for FailingStore {
    async fn insert(&self, _entity: &OwnedEntity) -> Result<(), ActivityError> {
        Err(refused())
    }

    async fn get(&self, _id: &SubjectId) -> Result<Option<OwnedEntity>, ActivityError> {
        Err(refused())
    }

    async fn update(&self, _entity: &OwnedEntity) -> Result<(), ActivityError> {
        Err(refused())
    }

    async fn delete(&self, _id: &SubjectId) -> Result<bool, ActivityError> {
        Err(refused())
    }

    async fn list_by_owner(
        &self,
        _user_id: &UserId,
        _kind: Option<EntityKind>,
    ) -> Result<Vec<OwnedEntity>, ActivityError> {
        Err(refused())
    }
}
