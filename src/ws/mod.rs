//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The endpoint at `/ws` streams recorded activity events to identified
//! clients that subscribe to subject ids they own, or to `"*"` for all of
//! them.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
