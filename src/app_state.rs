//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::ActivityConfig;
use crate::domain::{Clock, EventBus};
use crate::geo::GeoLocator;
use crate::persistence::{EntityStore, EventStore};
use crate::service::{ActivityRecorder, EntityService, EventReader};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Writes activity events.
    pub recorder: Arc<ActivityRecorder>,
    /// Reads recent events back for dashboards.
    pub reader: Arc<EventReader>,
    /// Owned store/service catalog.
    pub entities: Arc<EntityService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires the service layer over the given backends.
    #[must_use]
    pub fn new(
        event_store: Arc<dyn EventStore>,
        entity_store: Arc<dyn EntityStore>,
        geo: Arc<dyn GeoLocator>,
        clock: Arc<dyn Clock>,
        config: &ActivityConfig,
    ) -> Self {
        let event_bus = EventBus::new(config.event_bus_capacity);
        let recorder = ActivityRecorder::new(
            Arc::clone(&event_store),
            geo,
            Arc::clone(&clock),
            event_bus.clone(),
        );
        let reader = EventReader::new(
            Arc::clone(&event_store),
            Arc::clone(&entity_store),
            config.event_page_size,
            config.event_max_subject_ids,
        );
        let entities = EntityService::new(entity_store, event_store, clock);

        Self {
            recorder: Arc::new(recorder),
            reader: Arc::new(reader),
            entities: Arc::new(entities),
            event_bus,
        }
    }
}
