//! Event route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use guildhall_core::EventId;

use crate::db::{EventRepository, TicketRepository};
use crate::error::Result;
use crate::middleware::CurrentRequester;
use crate::models::EventFilter;
use crate::projection::{EventWithTickets, project_event};
use crate::state::AppState;

/// Event listing query parameters.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub starts_after: Option<DateTime<Utc>>,
    pub starts_before: Option<DateTime<Utc>>,
}

/// List published events with their nested visible tickets.
pub async fn index(
    State(state): State<AppState>,
    CurrentRequester(requester): CurrentRequester,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<EventWithTickets>>> {
    let now = Utc::now();
    let filter = EventFilter {
        starts_after: query.starts_after,
        starts_before: query.starts_before,
    };

    let events = EventRepository::new(state.pool())
        .list_published(&filter)
        .await?;

    let event_ids: Vec<EventId> = events.iter().map(|event| event.id).collect();
    let mut tickets_by_event = TicketRepository::new(state.pool())
        .list_visible_for_events(&event_ids, &requester, now)
        .await?;

    let views = events
        .iter()
        .map(|event| {
            let records = tickets_by_event.remove(&event.id).unwrap_or_default();
            project_event(event, &records)
        })
        .collect();

    Ok(Json(views))
}
