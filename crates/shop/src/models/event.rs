//! Event domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use guildhall_core::EventId;

/// An event that tickets admit to.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub published: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// The minimal client-facing view of this event.
    ///
    /// Deliberately excludes the ticket list so ticket views can carry an
    /// event back-reference without creating a cycle.
    #[must_use]
    pub fn summary(&self) -> EventSummary {
        EventSummary {
            id: self.id,
            name: self.name.clone(),
            location: self.location.clone(),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            tags: self.tags.clone(),
        }
    }
}

/// Minimal event data embedded in ticket views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: EventId,
    pub name: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

/// Caller-supplied event listing filters.
///
/// Combined with the base visibility predicate (published, not deleted)
/// in `db::events::EventRepository::list_published`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilter {
    pub starts_after: Option<DateTime<Utc>>,
    pub starts_before: Option<DateTime<Utc>>,
}
