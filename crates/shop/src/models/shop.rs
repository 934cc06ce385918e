//! Shoppable, ticket, and claim domain types.
//!
//! A `Shoppable` is the generic purchasable entity; a `Ticket` specializes it
//! for event admission. `Consumable` and `Reservation` rows are created by the
//! checkout flows and are read-only from this service's perspective.

use chrono::{DateTime, Duration, Utc};

use guildhall_core::{ConsumableId, EventId, Price, ReservationId, ShoppableId, TicketId};

use crate::projection::LISTING_TAIL_DAYS;

/// Generic purchasable entity with an availability window and stock.
#[derive(Debug, Clone)]
pub struct Shoppable {
    pub id: ShoppableId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    /// Total capacity. Claims count against this, never mutate it.
    pub stock: i32,
    pub available_from: DateTime<Utc>,
    pub available_to: Option<DateTime<Utc>>,
    /// Soft-delete marker. A future timestamp means "scheduled for removal".
    pub removed_at: Option<DateTime<Utc>>,
}

impl Shoppable {
    /// Whether this shoppable appears in listings at `now`.
    ///
    /// Listed while not soft-removed (or removal is still in the future) and
    /// while the sales window has not ended more than [`LISTING_TAIL_DAYS`]
    /// days ago. The trailing window keeps just-closed sales visible.
    ///
    /// The SQL listing filter in `db::tickets` mirrors this definition.
    #[must_use]
    pub fn is_listed(&self, now: DateTime<Utc>) -> bool {
        let not_removed = self.removed_at.is_none_or(|removed| removed > now);
        let within_tail = self
            .available_to
            .is_none_or(|until| until > now - Duration::days(LISTING_TAIL_DAYS));
        not_removed && within_tail
    }
}

/// Event admission ticket, a specialization of [`Shoppable`].
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    pub event_id: EventId,
    /// Cap on purchased consumables per requester.
    pub max_amount_per_user: i32,
    pub shoppable: Shoppable,
}

/// A unit claimed against a shoppable by one identity.
///
/// `purchased_at = None` means the claim is still in a cart.
#[derive(Debug, Clone)]
pub struct Consumable {
    pub id: ConsumableId,
    pub shoppable_id: ShoppableId,
    pub purchased_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Consumable {
    /// Whether the claim has been paid for.
    #[must_use]
    pub const fn is_purchased(&self) -> bool {
        self.purchased_at.is_some()
    }

    /// Whether the claim is an in-cart hold (not yet purchased).
    #[must_use]
    pub const fn is_cart_hold(&self) -> bool {
        self.purchased_at.is_none()
    }

    /// Whether the claim counts against stock at `now`.
    ///
    /// Purchased claims count permanently. Unpurchased claims count while
    /// their hold is unexpired; a null `expires_at` is a retained hold that
    /// never lapses. The claimed-count subquery in `db::tickets` mirrors
    /// this definition.
    #[must_use]
    pub fn counts_against_stock(&self, now: DateTime<Utc>) -> bool {
        self.purchased_at.is_some() || self.expires_at.is_none_or(|expires| expires > now)
    }
}

/// Queue-position record for a shoppable whose stock is exhausted.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: ReservationId,
    pub shoppable_id: ShoppableId,
    /// Queue position. Non-null means the holder committed to the queue.
    pub order: Option<i32>,
}

impl Reservation {
    /// Whether the holder has committed to a queue position.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.order.is_some()
    }
}

/// One ticket with everything the projection needs: the requester's own
/// claims and the stock-wide aggregate counts.
///
/// Assembled by `db::tickets::TicketRepository`; consumed by
/// [`crate::projection::TicketView::project`].
#[derive(Debug, Clone)]
pub struct TicketRecord {
    pub ticket: Ticket,
    /// Consumables counting against stock, across all users.
    pub claimed_total: i64,
    /// Committed (non-null order) reservations, across all users.
    pub committed_reservations_total: i64,
    /// The requester's consumables for this shoppable.
    pub own_consumables: Vec<Consumable>,
    /// The requester's reservations for this shoppable.
    pub own_reservations: Vec<Reservation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use guildhall_core::CurrencyCode;
    use rust_decimal::Decimal;

    fn shoppable(
        available_to: Option<DateTime<Utc>>,
        removed_at: Option<DateTime<Utc>>,
    ) -> Shoppable {
        Shoppable {
            id: ShoppableId::new(1),
            name: "Spring Ball".to_string(),
            description: None,
            price: Price::new(Decimal::new(25000, 2), CurrencyCode::SEK),
            stock: 100,
            available_from: Utc::now() - Duration::days(30),
            available_to,
            removed_at,
        }
    }

    #[test]
    fn test_listed_when_not_removed_and_open_ended() {
        let now = Utc::now();
        assert!(shoppable(None, None).is_listed(now));
    }

    #[test]
    fn test_not_listed_when_removed_in_past() {
        let now = Utc::now();
        assert!(!shoppable(None, Some(now - Duration::hours(1))).is_listed(now));
    }

    #[test]
    fn test_listed_when_removal_scheduled_in_future() {
        let now = Utc::now();
        assert!(shoppable(None, Some(now + Duration::hours(1))).is_listed(now));
    }

    #[test]
    fn test_listed_within_trailing_window() {
        let now = Utc::now();
        // Sales ended 5 days ago: still inside the 10-day tail.
        assert!(shoppable(Some(now - Duration::days(5)), None).is_listed(now));
    }

    #[test]
    fn test_not_listed_past_trailing_window() {
        let now = Utc::now();
        assert!(!shoppable(Some(now - Duration::days(11)), None).is_listed(now));
    }

    fn consumable(
        purchased_at: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Consumable {
        Consumable {
            id: ConsumableId::new(1),
            shoppable_id: ShoppableId::new(1),
            purchased_at,
            expires_at,
        }
    }

    #[test]
    fn test_purchased_consumable_always_counts() {
        let now = Utc::now();
        let claim = consumable(Some(now - Duration::days(2)), Some(now - Duration::days(1)));
        assert!(claim.is_purchased());
        assert!(claim.counts_against_stock(now));
    }

    #[test]
    fn test_active_hold_counts() {
        let now = Utc::now();
        let claim = consumable(None, Some(now + Duration::minutes(10)));
        assert!(claim.is_cart_hold());
        assert!(claim.counts_against_stock(now));
    }

    #[test]
    fn test_expired_hold_does_not_count() {
        let now = Utc::now();
        let claim = consumable(None, Some(now - Duration::minutes(10)));
        assert!(!claim.counts_against_stock(now));
    }

    #[test]
    fn test_retained_hold_counts() {
        // Null expiry = never-expiring historical hold.
        let now = Utc::now();
        assert!(consumable(None, None).counts_against_stock(now));
    }

    #[test]
    fn test_reservation_commitment() {
        let committed = Reservation {
            id: ReservationId::new(1),
            shoppable_id: ShoppableId::new(1),
            order: Some(3),
        };
        let uncommitted = Reservation {
            id: ReservationId::new(2),
            shoppable_id: ShoppableId::new(1),
            order: None,
        };
        assert!(committed.is_committed());
        assert!(!uncommitted.is_committed());
    }
}
