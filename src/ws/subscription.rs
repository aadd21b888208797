//! Per-connection subscription manager.
//!
//! Tracks which subject ids a WebSocket client follows and filters
//! broadcast events server-side. Only subjects the caller owns can be
//! followed.

use std::collections::HashSet;

use super::messages::WILDCARD;
use crate::domain::SubjectId;

/// Result of a subscribe command.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SubscribeOutcome {
    /// Ids that were newly followed.
    pub added: Vec<SubjectId>,
    /// Requested ids the caller does not own.
    pub rejected: Vec<String>,
}

/// Manages the set of subject subscriptions for a single WebSocket
/// connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    subject_ids: HashSet<SubjectId>,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Follows the requested ids that appear in `owned`.
    ///
    /// `"*"` follows every id in `owned` as of this call; entities created
    /// later need another subscribe.
    pub fn subscribe(
        &mut self,
        raw_ids: &[String],
        owned: &HashSet<SubjectId>,
    ) -> SubscribeOutcome {
        let mut outcome = SubscribeOutcome::default();
        for raw in raw_ids.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            if raw == WILDCARD {
                for id in owned {
                    if self.subject_ids.insert(id.clone()) {
                        outcome.added.push(id.clone());
                    }
                }
                continue;
            }
            let id = SubjectId::from(raw);
            if !owned.contains(&id) {
                outcome.rejected.push(raw.to_string());
            } else if self.subject_ids.insert(id.clone()) {
                outcome.added.push(id);
            }
        }
        outcome
    }

    /// Removes subject ids. `"*"` removes every followed id. Returns the ids
    /// that were actually removed.
    pub fn unsubscribe(&mut self, raw_ids: &[String]) -> Vec<SubjectId> {
        let mut removed = Vec::new();
        for raw in raw_ids.iter().map(|s| s.trim()) {
            if raw == WILDCARD {
                removed.extend(self.subject_ids.drain());
            } else {
                let id = SubjectId::from(raw);
                if self.subject_ids.remove(&id) {
                    removed.push(id);
                }
            }
        }
        removed
    }

    /// Returns `true` if events for `subject_id` should be forwarded.
    #[must_use]
    pub fn matches(&self, subject_id: &SubjectId) -> bool {
        self.subject_ids.contains(subject_id)
    }

    /// Returns the number of followed subject ids.
    #[must_use]
    pub fn count(&self) -> usize {
        self.subject_ids.len()
    }
}
