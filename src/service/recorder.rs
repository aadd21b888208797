//! Activity recorder: enriches and appends one event per call.

use std::sync::Arc;

use crate::domain::{ActivityEvent, ClientContext, Clock, EventBus, EventId, RecordActivity};
use crate::error::ActivityError;
use crate::geo::{GeoLocator, resolve_location};
use crate::persistence::EventStore;

/// Writes activity events.
///
/// Recording is best-effort telemetry. [`ActivityRecorder::record`] never
/// returns an error and never guarantees the event was persisted; the
/// geolocation lookup can fail without blocking the write, and a failed
/// write is logged and dropped. Duplicate calls produce duplicate events.
#[derive(Debug, Clone)]
pub struct ActivityRecorder {
    store: Arc<dyn EventStore>,
    geo: Arc<dyn GeoLocator>,
    clock: Arc<dyn Clock>,
    event_bus: EventBus,
}

impl ActivityRecorder {
    /// Creates a new recorder.
    #[must_use]
    pub fn new(
        store: Arc<dyn EventStore>,
        geo: Arc<dyn GeoLocator>,
        clock: Arc<dyn Clock>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store,
            geo,
            clock,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Records one event, swallowing any failure.
    pub async fn record(&self, input: RecordActivity, client: &ClientContext) {
        let subject_id = input.subject_id.clone();
        let action = input.action.clone();
        if let Err(e) = self.try_record(input, client).await {
            tracing::warn!(
                %subject_id,
                %action,
                error = %e,
                "dropping activity event"
            );
        }
    }

    /// Records one event and reports the outcome.
    ///
    /// The location is resolved first and falls back to the placeholder on
    /// any lookup failure. On a successful write the event is published on
    /// the event bus.
    ///
    /// # Errors
    ///
    /// Returns the store's [`ActivityError`] if the append fails.
    pub async fn try_record(
        &self,
        input: RecordActivity,
        client: &ClientContext,
    ) -> Result<ActivityEvent, ActivityError> {
        let location = resolve_location(self.geo.as_ref(), client.ip).await;
        let device = input.device(client);

        let event = ActivityEvent {
            id: EventId::new(),
            action: input.action,
            subject_id: input.subject_id,
            subject_name: input.subject_name,
            details: input.details,
            value: input.value,
            event_type: input.event_type,
            location,
            device,
            extra: serde_json::Value::Object(input.extra),
            timestamp: self.clock.now(),
        };

        self.store.append(&event).await?;
        let receivers = self.event_bus.publish(event.clone());

        tracing::info!(
            event_id = %event.id,
            subject_id = %event.subject_id,
            action = %event.action,
            location = %event.location,
            receivers,
            "activity recorded"
        );
        Ok(event)
    }
}
