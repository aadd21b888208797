//! Event DTOs for recording and reading activity.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::split_subject_ids;
use crate::domain::{Action, ActivityEvent, EventType, RecordActivity, SubjectId};

/// Request body for `POST /api/v1/events`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordActivityRequest {
    /// What happened, e.g. `"View"`, `"Favorite"`, `"Review"`.
    #[schema(value_type = String, example = "Favorite")]
    pub action: Action,
    /// Store or service the event is about.
    pub subject_id: SubjectId,
    /// Display name of the subject.
    pub subject_name: String,
    /// Human-readable description.
    #[serde(default)]
    pub details: String,
    /// Optional numeric payload such as a star rating.
    #[serde(default)]
    pub value: Option<f64>,
    /// Coarse classification. Unknown values fall back to `General`.
    #[serde(default)]
    #[schema(value_type = String, example = "General")]
    pub event_type: EventType,
    /// Additional fields stored with the event. A `device` entry of
    /// `"Mobile"` or `"Desktop"` overrides User-Agent detection.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<RecordActivityRequest> for RecordActivity {
    fn from(req: RecordActivityRequest) -> Self {
        Self {
            action: req.action,
            subject_id: req.subject_id,
            subject_name: req.subject_name,
            details: req.details,
            value: req.value,
            event_type: req.event_type,
            extra: req.extra,
        }
    }
}

/// Query parameters selecting subjects by id.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubjectQuery {
    /// Comma-separated subject ids. Only the first ten are used.
    #[param(example = "store-1,service-9")]
    pub subject_ids: Option<String>,
}

impl SubjectQuery {
    /// Parsed, non-empty subject ids in the order given.
    #[must_use]
    pub fn ids(&self) -> Vec<SubjectId> {
        split_subject_ids(self.subject_ids.as_deref())
    }
}

/// Response body for event reads.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventListResponse {
    /// Events, newest first.
    pub data: Vec<ActivityEvent>,
    /// Number of events returned.
    pub count: usize,
    /// Read cap the page was fetched with.
    pub page_size: usize,
}

impl EventListResponse {
    /// Wraps a page read with the given cap.
    #[must_use]
    pub fn new(data: Vec<ActivityEvent>, page_size: usize) -> Self {
        Self {
            count: data.len(),
            data,
            page_size,
        }
    }
}
