//! HTTP route handlers for the shop API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the database)
//!
//! # Tickets
//! GET  /api/tickets            - Visible tickets for the requester
//! GET  /api/tickets/{id}       - Single projected ticket (404 when absent)
//!
//! # Events
//! GET  /api/events             - Published events with nested visible tickets
//!                                (?starts_after=&starts_before=)
//! ```

pub mod events;
pub mod tickets;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the ticket routes router.
pub fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::index))
        .route("/{id}", get(tickets::show))
}

/// Create the event routes router.
pub fn event_routes() -> Router<AppState> {
    Router::new().route("/", get(events::index))
}

/// Create all routes for the shop API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/tickets", ticket_routes())
        .nest("/api/events", event_routes())
}
