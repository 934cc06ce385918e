//! Client-facing ticket projections.
//!
//! The raw ticket records carry per-user claim lists and stock-wide counts
//! that must never reach a client. Everything identity-sensitive is reduced
//! here to derived booleans and one capped integer; the view types below are
//! the only shop data serialized across the API boundary.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use guildhall_core::{EventId, Price, TicketId};

use crate::models::{Event, EventSummary, TicketRecord};

/// Remaining stock is reported at most as this value, so clients cannot
/// read demand off the exact count.
pub const MAX_TICKETS_LEFT_SHOWN: i64 = 10;

/// Extra time after `available_from` during which purchase leniency applies.
pub const GRACE_PERIOD_MINUTES: i64 = 30;

/// Days a ticket stays listed after its sales window closes.
pub const LISTING_TAIL_DAYS: i64 = 10;

/// Client-safe view of one ticket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    pub id: TicketId,
    pub event_id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub available_from: DateTime<Utc>,
    pub available_to: Option<DateTime<Utc>>,
    pub max_amount_per_user: i32,
    /// `available_from` plus the fixed grace window.
    pub grace_period_ends_at: DateTime<Utc>,
    /// Remaining stock, capped at [`MAX_TICKETS_LEFT_SHOWN`]. May be zero or
    /// negative when oversold; the low end is intentionally not clamped.
    pub tickets_left: i64,
    /// The requester holds an unpurchased consumable or a reservation.
    pub is_in_users_cart: bool,
    /// The requester's purchased count has reached `max_amount_per_user`.
    pub user_already_has_max: bool,
    /// Someone, anyone, has committed to the waiting queue.
    pub has_queue: bool,
    /// Back-reference to the event, without its ticket list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventSummary>,
}

impl TicketView {
    /// Project a raw ticket record into its client-safe view.
    ///
    /// Pure transform: no queries, no clock reads. The record's aggregate
    /// counts and the requester's own claim lists are consumed here and do
    /// not appear in the output.
    #[must_use]
    pub fn project(record: &TicketRecord, event: Option<EventSummary>) -> Self {
        let ticket = &record.ticket;
        let shoppable = &ticket.shoppable;

        let purchased_by_user = record
            .own_consumables
            .iter()
            .filter(|claim| claim.is_purchased())
            .count();
        let max_per_user = usize::try_from(ticket.max_amount_per_user).unwrap_or(0);

        let has_cart_hold = record
            .own_consumables
            .iter()
            .any(|claim| claim.is_cart_hold());

        Self {
            id: ticket.id,
            event_id: ticket.event_id,
            name: shoppable.name.clone(),
            description: shoppable.description.clone(),
            price: shoppable.price,
            available_from: shoppable.available_from,
            available_to: shoppable.available_to,
            max_amount_per_user: ticket.max_amount_per_user,
            grace_period_ends_at: shoppable.available_from
                + Duration::minutes(GRACE_PERIOD_MINUTES),
            tickets_left: (i64::from(shoppable.stock) - record.claimed_total)
                .min(MAX_TICKETS_LEFT_SHOWN),
            is_in_users_cart: has_cart_hold || !record.own_reservations.is_empty(),
            user_already_has_max: purchased_by_user >= max_per_user,
            has_queue: record.committed_reservations_total > 0,
            event,
        }
    }
}

/// One event with its visible tickets, for the events listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWithTickets {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub tickets: Vec<TicketView>,
}

/// Project an event and its ticket records for the events listing.
///
/// Each ticket view carries the event's summary as a back-reference; the
/// summary excludes the ticket list, so the graph stays acyclic.
#[must_use]
pub fn project_event(event: &Event, records: &[TicketRecord]) -> EventWithTickets {
    let summary = event.summary();
    EventWithTickets {
        id: event.id,
        name: event.name.clone(),
        description: event.description.clone(),
        location: event.location.clone(),
        starts_at: event.starts_at,
        ends_at: event.ends_at,
        tags: event.tags.clone(),
        tickets: records
            .iter()
            .map(|record| TicketView::project(record, Some(summary.clone())))
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{Consumable, Reservation, Shoppable, Ticket};
    use guildhall_core::{
        ConsumableId, CurrencyCode, EventId, ReservationId, ShoppableId, TicketId,
    };
    use rust_decimal::Decimal;

    fn record(stock: i32, claimed_total: i64) -> TicketRecord {
        TicketRecord {
            ticket: Ticket {
                id: TicketId::new(1),
                event_id: EventId::new(1),
                max_amount_per_user: 2,
                shoppable: Shoppable {
                    id: ShoppableId::new(1),
                    name: "Autumn Gasque".to_string(),
                    description: Some("Three-course dinner and afterparty".to_string()),
                    price: Price::new(Decimal::new(35000, 2), CurrencyCode::SEK),
                    stock,
                    available_from: Utc::now() - Duration::days(1),
                    available_to: None,
                    removed_at: None,
                },
            },
            claimed_total,
            committed_reservations_total: 0,
            own_consumables: Vec::new(),
            own_reservations: Vec::new(),
        }
    }

    fn purchased(n: usize) -> Vec<Consumable> {
        (0..n)
            .map(|i| Consumable {
                id: ConsumableId::new(i32::try_from(i).unwrap() + 1),
                shoppable_id: ShoppableId::new(1),
                purchased_at: Some(Utc::now() - Duration::days(1)),
                expires_at: None,
            })
            .collect()
    }

    fn cart_hold() -> Consumable {
        Consumable {
            id: ConsumableId::new(99),
            shoppable_id: ShoppableId::new(1),
            purchased_at: None,
            expires_at: Some(Utc::now() + Duration::minutes(15)),
        }
    }

    fn reservation(order: Option<i32>) -> Reservation {
        Reservation {
            id: ReservationId::new(1),
            shoppable_id: ShoppableId::new(1),
            order,
        }
    }

    #[test]
    fn test_tickets_left_capped_at_ten() {
        let view = TicketView::project(&record(500, 3), None);
        assert_eq!(view.tickets_left, MAX_TICKETS_LEFT_SHOWN);
    }

    #[test]
    fn test_tickets_left_exactly_ten_at_cap_boundary() {
        let view = TicketView::project(&record(13, 3), None);
        assert_eq!(view.tickets_left, 10);
    }

    #[test]
    fn test_tickets_left_exact_below_cap() {
        let view = TicketView::project(&record(10, 7), None);
        assert_eq!(view.tickets_left, 3);
    }

    #[test]
    fn test_tickets_left_unclamped_when_oversold() {
        // Low end is deliberately not clamped.
        let view = TicketView::project(&record(10, 12), None);
        assert_eq!(view.tickets_left, -2);
    }

    #[test]
    fn test_user_already_has_max_at_cap() {
        let mut rec = record(100, 0);
        rec.own_consumables = purchased(2);
        let view = TicketView::project(&rec, None);
        assert!(view.user_already_has_max);
    }

    #[test]
    fn test_user_below_max() {
        let mut rec = record(100, 0);
        rec.own_consumables = purchased(1);
        let view = TicketView::project(&rec, None);
        assert!(!view.user_already_has_max);
    }

    #[test]
    fn test_in_cart_with_unpurchased_consumable() {
        let mut rec = record(100, 0);
        rec.own_consumables = vec![cart_hold()];
        let view = TicketView::project(&rec, None);
        assert!(view.is_in_users_cart);
    }

    #[test]
    fn test_in_cart_with_reservation_only() {
        let mut rec = record(100, 0);
        rec.own_reservations = vec![reservation(None)];
        let view = TicketView::project(&rec, None);
        assert!(view.is_in_users_cart);
    }

    #[test]
    fn test_not_in_cart_with_only_purchased() {
        let mut rec = record(100, 0);
        rec.own_consumables = purchased(2);
        let view = TicketView::project(&rec, None);
        assert!(!view.is_in_users_cart);
    }

    #[test]
    fn test_has_queue_follows_committed_total() {
        let mut rec = record(100, 0);
        rec.committed_reservations_total = 1;
        assert!(TicketView::project(&rec, None).has_queue);

        rec.committed_reservations_total = 0;
        assert!(!TicketView::project(&rec, None).has_queue);
    }

    #[test]
    fn test_grace_period_is_available_from_plus_window() {
        let rec = record(100, 0);
        let view = TicketView::project(&rec, None);
        assert_eq!(
            view.grace_period_ends_at,
            rec.ticket.shoppable.available_from + Duration::minutes(GRACE_PERIOD_MINUTES)
        );
    }

    #[test]
    fn test_projection_leaks_no_raw_claims() {
        let mut rec = record(100, 5);
        rec.own_consumables = purchased(1);
        rec.own_consumables.push(cart_hold());
        rec.own_reservations = vec![reservation(Some(1))];
        rec.committed_reservations_total = 4;

        let view = TicketView::project(&rec, None);
        let json = serde_json::to_value(&view).unwrap();
        let object = json.as_object().unwrap();

        assert!(!object.contains_key("consumables"));
        assert!(!object.contains_key("reservations"));
        assert!(!object.contains_key("ownConsumables"));
        assert!(!object.contains_key("ownReservations"));
        assert!(object.keys().all(|key| !key.contains("_count")));
        assert!(object.keys().all(|key| !key.to_lowercase().contains("total")));
    }

    #[test]
    fn test_event_back_reference_has_no_ticket_list() {
        let event = Event {
            id: EventId::new(1),
            name: "Spring Ball".to_string(),
            description: None,
            location: Some("Great Hall".to_string()),
            starts_at: Utc::now() + Duration::days(30),
            ends_at: None,
            tags: vec!["formal".to_string()],
            published: true,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let projected = project_event(&event, &[record(50, 0)]);

        assert_eq!(projected.tickets.len(), 1);
        let ticket_json =
            serde_json::to_value(projected.tickets.first().unwrap()).unwrap();
        let embedded_event = ticket_json.get("event").unwrap().as_object().unwrap();
        assert!(!embedded_event.contains_key("tickets"));
        assert_eq!(
            embedded_event.get("name").unwrap().as_str().unwrap(),
            "Spring Ball"
        );
    }

    #[test]
    fn test_list_ticket_view_omits_event_when_absent() {
        let view = TicketView::project(&record(50, 0), None);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("event").is_none());
    }
}
