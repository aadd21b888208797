//! Database row models for events and entities.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Action, ActivityEvent, Device, EntityKind, EventId, EventType, OwnedEntity, SubjectId, UserId,
};
use crate::error::ActivityError;

/// A row from the `events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Event identifier.
    pub id: Uuid,
    /// Action tag.
    pub action: String,
    /// Subject identifier.
    pub subject_id: String,
    /// Subject display name.
    pub subject_name: String,
    /// Description.
    pub details: String,
    /// Optional numeric payload.
    pub value: Option<f64>,
    /// Event type string.
    pub event_type: String,
    /// Location string.
    pub location: String,
    /// Device string.
    pub device: String,
    /// JSONB extra fields.
    pub extra: serde_json::Value,
    /// Write timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for ActivityEvent {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::from_uuid(row.id),
            action: Action::from(row.action),
            subject_id: SubjectId::from(row.subject_id),
            subject_name: row.subject_name,
            details: row.details,
            value: row.value,
            event_type: EventType::from(row.event_type),
            location: row.location,
            device: Device::parse(&row.device).unwrap_or_default(),
            extra: row.extra,
            timestamp: row.created_at,
        }
    }
}

/// A row from the `entities` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntityRow {
    /// Entity identifier.
    pub id: String,
    /// `"store"` or `"service"`.
    pub kind: String,
    /// Display name.
    pub name: String,
    /// Owner id.
    pub user_id: String,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EntityRow> for OwnedEntity {
    type Error = ActivityError;

    fn try_from(row: EntityRow) -> Result<Self, Self::Error> {
        let kind: EntityKind = row
            .kind
            .parse()
            .map_err(|_| ActivityError::Persistence(format!("corrupt entity kind: {}", row.kind)))?;
        Ok(Self {
            id: SubjectId::from(row.id),
            kind,
            name: row.name,
            user_id: UserId::new(row.user_id),
            description: row.description,
            category: row.category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
