//! Service layer: recording, reading, aggregating, and the entity catalog.
//!
//! [`ActivityRecorder`] writes events and publishes them on the
//! [`crate::domain::EventBus`]. [`EventReader`] reads them back and the
//! [`aggregator`] functions reduce a page into dashboard metrics.
//! [`EntityService`] owns the store/service catalog and its ownership
//! checks.

pub mod aggregator;
pub mod entity_service;
pub mod reader;
pub mod recorder;

pub use aggregator::{CountEntry, DeviceSplit, MetricsSummary};
pub use entity_service::EntityService;
pub use reader::EventReader;
pub use recorder::ActivityRecorder;
