//! # storefront-activity
//!
//! Activity recording and dashboard metrics for marketplace stores and
//! services.
//!
//! The service records what users do to a store or service (views,
//! favorites, reviews, creations) as an append-only event log, enriched
//! with a best-effort client location and device class. Dashboards read
//! the most recent page of events back for the subjects a user owns and
//! reduce it to summary metrics. A WebSocket feed streams events live.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── ActivityRecorder / EventReader / EntityService (service/)
//!     ├── Aggregator (service/aggregator)
//!     ├── EventBus (domain/)
//!     │
//!     ├── GeoLocator (geo/)
//!     │
//!     └── EventStore / EntityStore (persistence/): PostgreSQL or in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod geo;
pub mod persistence;
pub mod service;
pub mod ws;

#[cfg(test)]
mod testing;
