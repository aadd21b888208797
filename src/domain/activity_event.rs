//! Activity event records and their classification tags.
//!
//! An [`ActivityEvent`] is an immutable, append-only log entry describing
//! something that happened to a subject (a store, a service, or a user).
//! Once written it is never updated or deleted.

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EventId, SubjectId};

/// Placeholder location written when the geolocation lookup fails.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// What happened. The set is open-ended: unrecognised tags are kept
/// verbatim in [`Action::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    /// A subject page was viewed.
    View,
    /// A subject was added to favorites.
    Favorite,
    /// A review was left on a subject.
    Review,
    /// A subject was created.
    Create,
    /// A user signed in.
    Login,
    /// A user signed out.
    Logout,
    /// Any other caller-defined tag.
    Other(String),
}

impl Action {
    /// Returns the canonical tag string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::View => "View",
            Self::Favorite => "Favorite",
            Self::Review => "Review",
            Self::Create => "Create",
            Self::Login => "Login",
            Self::Logout => "Logout",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Action {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "view" => Self::View,
            "favorite" => Self::Favorite,
            "review" => Self::Review,
            "create" => Self::Create,
            "login" => Self::Login,
            "logout" => Self::Logout,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for Action {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of an event. Unknown strings become
/// [`EventType::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// Anything without a more specific type.
    #[default]
    General,
    /// Carries a star rating in `value`.
    Rating,
    /// A favorite toggle.
    Favorite,
    /// A page view.
    View,
}

impl EventType {
    /// Returns the canonical type string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Rating => "Rating",
            Self::Favorite => "Favorite",
            Self::View => "View",
        }
    }
}

impl From<String> for EventType {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "rating" => Self::Rating,
            "favorite" => Self::Favorite,
            "view" => Self::View,
            _ => Self::General,
        }
    }
}

impl From<EventType> for String {
    fn from(kind: EventType) -> Self {
        kind.as_str().to_string()
    }
}

/// Device class of the client that triggered the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum Device {
    /// Phones and tablets.
    Mobile,
    /// Everything else.
    #[default]
    Desktop,
}

impl Device {
    /// Parses `"Mobile"` / `"Desktop"` case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "mobile" => Some(Self::Mobile),
            "desktop" => Some(Self::Desktop),
            _ => None,
        }
    }

    /// Classifies a `User-Agent` header value.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        const MOBILE_MARKERS: [&str; 4] = ["mobi", "android", "iphone", "ipad"];
        let ua = user_agent.to_ascii_lowercase();
        if MOBILE_MARKERS.iter().any(|marker| ua.contains(marker)) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Returns the canonical device string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Desktop => "Desktop",
        }
    }
}

/// A recorded activity event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivityEvent {
    /// Unique event identifier.
    pub id: EventId,
    /// What happened (`View`, `Favorite`, `Review`, ...).
    #[schema(value_type = String, example = "View")]
    pub action: Action,
    /// Subject the event is about.
    pub subject_id: SubjectId,
    /// Display name of the subject at write time.
    pub subject_name: String,
    /// Human-readable description.
    pub details: String,
    /// Optional numeric payload such as a star rating.
    pub value: Option<f64>,
    /// Coarse classification.
    #[schema(value_type = String, example = "General")]
    pub event_type: EventType,
    /// `"City, Country"` or [`UNKNOWN_LOCATION`].
    pub location: String,
    /// Device class of the client.
    pub device: Device,
    /// Additional caller-supplied fields.
    #[schema(value_type = Object)]
    pub extra: serde_json::Value,
    /// Write time.
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    /// Returns `true` for `View` actions.
    #[must_use]
    pub fn is_view(&self) -> bool {
        self.action == Action::View
    }

    /// Returns `true` for `Favorite` actions.
    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.action == Action::Favorite
    }

    /// Returns the rating carried by this event, if it is a review or a
    /// rating-typed event with a value.
    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        if self.action == Action::Review || self.event_type == EventType::Rating {
            self.value
        } else {
            None
        }
    }
}

/// Orders events newest first. Stable, so already-sorted input is left
/// untouched.
pub fn sort_newest_first(events: &mut [ActivityEvent]) {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Caller input for recording one event.
#[derive(Debug, Clone)]
pub struct RecordActivity {
    /// What happened.
    pub action: Action,
    /// Subject the event is about.
    pub subject_id: SubjectId,
    /// Display name of the subject.
    pub subject_name: String,
    /// Human-readable description.
    pub details: String,
    /// Optional numeric payload.
    pub value: Option<f64>,
    /// Coarse classification.
    pub event_type: EventType,
    /// Extra fields; a `device` entry overrides User-Agent detection.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RecordActivity {
    /// Starts a record with empty details and no extra fields.
    #[must_use]
    pub fn new(action: Action, subject_id: SubjectId, subject_name: impl Into<String>) -> Self {
        Self {
            action,
            subject_id,
            subject_name: subject_name.into(),
            details: String::new(),
            value: None,
            event_type: EventType::General,
            extra: serde_json::Map::new(),
        }
    }

    /// Resolves the device tag: an explicit `device` extra field wins,
    /// then the User-Agent, then [`Device::Desktop`].
    #[must_use]
    pub fn device(&self, client: &ClientContext) -> Device {
        self.extra
            .get("device")
            .and_then(serde_json::Value::as_str)
            .and_then(Device::parse)
            .or_else(|| client.user_agent.as_deref().map(Device::from_user_agent))
            .unwrap_or_default()
    }
}

/// Request-scoped facts about the client that triggered an event.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    /// Client IP, taken from `x-forwarded-for` or the peer address.
    pub ip: Option<IpAddr>,
    /// Raw `User-Agent` header.
    pub user_agent: Option<String>,
}
