//! Event reader: fetches recent events for a set of subjects.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{ActivityEvent, SubjectId, UserId, sort_newest_first};
use crate::error::ActivityError;
use crate::persistence::{EntityStore, EventStore};

/// Reads recent events back for dashboards.
///
/// A read matches at most `max_subject_ids` subject ids (the first ones in
/// the order given) and returns at most `page_size` events, newest first.
/// Ids past the cap are dropped, not paged through. Store failures yield an
/// empty page.
///
/// Caller-facing reads go through [`recent_for_caller`](Self::recent_for_caller)
/// or [`recent_for_owner`](Self::recent_for_owner), which only ever query
/// subjects the caller owns.
#[derive(Debug, Clone)]
pub struct EventReader {
    events: Arc<dyn EventStore>,
    entities: Arc<dyn EntityStore>,
    page_size: usize,
    max_subject_ids: usize,
}

impl EventReader {
    /// Creates a new reader with the given limits.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventStore>,
        entities: Arc<dyn EntityStore>,
        page_size: usize,
        max_subject_ids: usize,
    ) -> Self {
        Self {
            events,
            entities,
            page_size,
            max_subject_ids,
        }
    }

    /// Maximum number of events per read.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns up to `page_size` recent events for the first
    /// `max_subject_ids` of `subject_ids`, newest first.
    pub async fn recent_for_subjects(&self, subject_ids: &[SubjectId]) -> Vec<ActivityEvent> {
        if subject_ids.is_empty() {
            return Vec::new();
        }

        let capped = subject_ids
            .get(..self.max_subject_ids)
            .unwrap_or(subject_ids);
        if capped.len() < subject_ids.len() {
            tracing::debug!(
                requested = subject_ids.len(),
                used = capped.len(),
                "subject id list truncated"
            );
        }

        match self.events.find_by_subjects(capped, self.page_size).await {
            Ok(mut events) => {
                sort_newest_first(&mut events);
                events
            }
            Err(e) => {
                tracing::warn!(error = %e, "event read failed, returning empty page");
                Vec::new()
            }
        }
    }

    /// Subject ids of the entities `user_id` owns, in creation order.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the catalog lookup fails.
    pub async fn owned_subject_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SubjectId>, ActivityError> {
        let owned = self.entities.list_by_owner(user_id, None).await?;
        Ok(owned.into_iter().map(|entity| entity.id).collect())
    }

    /// Returns recent events for the entities `user_id` owns, resolved from
    /// the catalog in creation order.
    pub async fn recent_for_owner(&self, user_id: &UserId) -> Vec<ActivityEvent> {
        match self.owned_subject_ids(user_id).await {
            Ok(ids) => self.recent_for_subjects(&ids).await,
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "owned entity lookup failed");
                Vec::new()
            }
        }
    }

    /// Returns recent events for the requested subject ids that `user_id`
    /// owns.
    ///
    /// Unowned ids are dropped before the subject id cap applies, so they
    /// neither leak events nor use up the cap. Request order is kept and
    /// duplicates are removed.
    pub async fn recent_for_caller(
        &self,
        user_id: &UserId,
        requested: &[SubjectId],
    ) -> Vec<ActivityEvent> {
        if requested.is_empty() {
            return Vec::new();
        }
        let owned: HashSet<SubjectId> = match self.owned_subject_ids(user_id).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "owned entity lookup failed");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let allowed: Vec<SubjectId> = requested
            .iter()
            .filter(|id| owned.contains(*id) && seen.insert(*id))
            .cloned()
            .collect();
        if allowed.len() < requested.len() {
            tracing::debug!(
                %user_id,
                requested = requested.len(),
                allowed = allowed.len(),
                "dropped subject ids the caller does not own"
            );
        }
        self.recent_for_subjects(&allowed).await
    }
}
