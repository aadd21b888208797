//! Broadcast channel for recorded activity events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. The recorder
//! publishes every event it persists, and live-feed WebSocket connections
//! subscribe to receive the ones for subjects they care about.

use tokio::sync::broadcast;

use super::ActivityEvent;

/// Broadcast bus for [`ActivityEvent`]s.
///
/// When the ring buffer is full the oldest events are dropped for lagging
/// receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ActivityEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that got it; zero when nobody is
    /// listening.
    pub fn publish(&self, event: ActivityEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver for all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
