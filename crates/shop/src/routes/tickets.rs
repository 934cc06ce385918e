//! Ticket route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use guildhall_core::TicketId;

use crate::db::{EventRepository, TicketRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentRequester;
use crate::projection::TicketView;
use crate::state::AppState;

/// List visible tickets for the requester.
pub async fn index(
    State(state): State<AppState>,
    CurrentRequester(requester): CurrentRequester,
) -> Result<Json<Vec<TicketView>>> {
    let now = Utc::now();
    let records = TicketRepository::new(state.pool())
        .list_visible(&requester, now)
        .await?;

    let views = records
        .iter()
        .map(|record| TicketView::project(record, None))
        .collect();

    Ok(Json(views))
}

/// Show a single projected ticket.
pub async fn show(
    State(state): State<AppState>,
    CurrentRequester(requester): CurrentRequester,
    Path(id): Path<i32>,
) -> Result<Json<TicketView>> {
    let now = Utc::now();
    let id = TicketId::new(id);

    let record = TicketRepository::new(state.pool())
        .get(id, &requester, now)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("ticket {id}")))?;

    let event = EventRepository::new(state.pool())
        .summary(record.ticket.event_id)
        .await?;

    Ok(Json(TicketView::project(&record, event)))
}
