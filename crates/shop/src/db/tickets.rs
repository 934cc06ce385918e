//! Ticket repository for database operations.
//!
//! Fetches tickets with their shoppable fields, stock-wide aggregate counts,
//! and the requester's own claims, assembled into [`TicketRecord`]s for the
//! projection layer. Ownership scoping always binds both owner columns from a
//! fixed [`guildhall_core::OwnershipKey`]; the absent side binds NULL and
//! matches nothing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use guildhall_core::{
    ConsumableId, CurrencyCode, EventId, Price, Requester, ReservationId, ShoppableId, TicketId,
};

use super::RepositoryError;
use crate::models::{Consumable, Reservation, Shoppable, Ticket, TicketRecord};
use crate::projection::LISTING_TAIL_DAYS;

/// Columns shared by every ticket query. `$1` is the request timestamp.
///
/// The claimed-count subquery mirrors `Consumable::counts_against_stock`:
/// purchased rows, retained holds (null expiry), and unexpired holds.
const TICKET_COLUMNS: &str = r"
    t.id,
    t.event_id,
    t.max_amount_per_user,
    s.id AS shoppable_id,
    s.name,
    s.description,
    s.price,
    s.currency,
    s.stock,
    s.available_from,
    s.available_to,
    s.removed_at,
    (SELECT COUNT(*) FROM consumables c
       WHERE c.shoppable_id = s.id
         AND (c.purchased_at IS NOT NULL
              OR c.expires_at IS NULL
              OR c.expires_at > $1)) AS claimed_count,
    (SELECT COUNT(*) FROM consumable_reservations r
       WHERE r.shoppable_id = s.id
         AND r.queue_order IS NOT NULL) AS committed_count
";

/// Listing visibility filter, mirroring `Shoppable::is_listed`.
fn visibility_filter() -> String {
    format!(
        "(s.removed_at IS NULL OR s.removed_at > $1)
         AND (s.available_to IS NULL
              OR s.available_to > $1 - make_interval(days => {LISTING_TAIL_DAYS}))"
    )
}

fn select_tickets(where_clause: &str, ordered: bool) -> String {
    let order = if ordered {
        " ORDER BY s.available_from ASC"
    } else {
        ""
    };
    format!(
        "SELECT {TICKET_COLUMNS}
         FROM tickets t
         JOIN shoppables s ON s.id = t.shoppable_id
         WHERE {where_clause}{order}"
    )
}

const OWNED_CONSUMABLES: &str = r"
    SELECT id, shoppable_id, purchased_at, expires_at
    FROM consumables
    WHERE shoppable_id = ANY($1)
      AND (member_id = $2 OR session_id = $3)
";

const OWNED_RESERVATIONS: &str = r"
    SELECT id, shoppable_id, queue_order
    FROM consumable_reservations
    WHERE shoppable_id = ANY($1)
      AND (member_id = $2 OR session_id = $3)
";

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: i32,
    event_id: i32,
    max_amount_per_user: i32,
    shoppable_id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    currency: String,
    stock: i32,
    available_from: DateTime<Utc>,
    available_to: Option<DateTime<Utc>>,
    removed_at: Option<DateTime<Utc>>,
    claimed_count: i64,
    committed_count: i64,
}

impl TicketRow {
    fn into_ticket(self) -> Result<Ticket, RepositoryError> {
        let currency: CurrencyCode = self.currency.trim().parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;

        Ok(Ticket {
            id: TicketId::new(self.id),
            event_id: EventId::new(self.event_id),
            max_amount_per_user: self.max_amount_per_user,
            shoppable: Shoppable {
                id: ShoppableId::new(self.shoppable_id),
                name: self.name,
                description: self.description,
                price: Price::new(self.price, currency),
                stock: self.stock,
                available_from: self.available_from,
                available_to: self.available_to,
                removed_at: self.removed_at,
            },
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ConsumableRow {
    id: i32,
    shoppable_id: i32,
    purchased_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<ConsumableRow> for Consumable {
    fn from(row: ConsumableRow) -> Self {
        Self {
            id: ConsumableId::new(row.id),
            shoppable_id: ShoppableId::new(row.shoppable_id),
            purchased_at: row.purchased_at,
            expires_at: row.expires_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: i32,
    shoppable_id: i32,
    queue_order: Option<i32>,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Self {
            id: ReservationId::new(row.id),
            shoppable_id: ShoppableId::new(row.shoppable_id),
            order: row.queue_order,
        }
    }
}

/// Repository for ticket database operations.
pub struct TicketRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TicketRepository<'a> {
    /// Create a new ticket repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List tickets visible at `now`, ordered by `available_from` ascending,
    /// with the requester's claims attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored currency is invalid.
    pub async fn list_visible(
        &self,
        requester: &Requester,
        now: DateTime<Utc>,
    ) -> Result<Vec<TicketRecord>, RepositoryError> {
        let sql = select_tickets(&visibility_filter(), true);
        let rows: Vec<TicketRow> = sqlx::query_as(&sql).bind(now).fetch_all(self.pool).await?;

        self.attach_claims(rows, requester).await
    }

    /// Get a single ticket by id with the requester's claims attached.
    ///
    /// Lookup by id applies no listing filter; an absent id yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored currency is invalid.
    pub async fn get(
        &self,
        id: TicketId,
        requester: &Requester,
        now: DateTime<Utc>,
    ) -> Result<Option<TicketRecord>, RepositoryError> {
        let sql = select_tickets("t.id = $2", false);
        let row: Option<TicketRow> = sqlx::query_as(&sql)
            .bind(now)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut records = self.attach_claims(vec![row], requester).await?;
                Ok(records.pop())
            }
            None => Ok(None),
        }
    }

    /// List visible tickets for a set of events, grouped by event id.
    ///
    /// Tickets within each event keep the `available_from` ascending order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored currency is invalid.
    pub async fn list_visible_for_events(
        &self,
        event_ids: &[EventId],
        requester: &Requester,
        now: DateTime<Utc>,
    ) -> Result<HashMap<EventId, Vec<TicketRecord>>, RepositoryError> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let raw_ids: Vec<i32> = event_ids.iter().map(|id| id.as_i32()).collect();
        let sql = select_tickets(
            &format!("{} AND t.event_id = ANY($2)", visibility_filter()),
            true,
        );
        let rows: Vec<TicketRow> = sqlx::query_as(&sql)
            .bind(now)
            .bind(raw_ids)
            .fetch_all(self.pool)
            .await?;

        let records = self.attach_claims(rows, requester).await?;

        let mut by_event: HashMap<EventId, Vec<TicketRecord>> = HashMap::new();
        for record in records {
            by_event
                .entry(record.ticket.event_id)
                .or_default()
                .push(record);
        }
        Ok(by_event)
    }

    /// Fetch the requester's consumables and reservations for the given rows
    /// and assemble the final records, preserving row order.
    async fn attach_claims(
        &self,
        rows: Vec<TicketRow>,
        requester: &Requester,
    ) -> Result<Vec<TicketRecord>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let shoppable_ids: Vec<i32> = rows.iter().map(|row| row.shoppable_id).collect();
        let key = requester.ownership();
        let member_id = key.member_id.map(|member| member.as_i32());
        let session_id = key.session_id;

        let consumable_rows: Vec<ConsumableRow> = sqlx::query_as(OWNED_CONSUMABLES)
            .bind(shoppable_ids.clone())
            .bind(member_id)
            .bind(session_id)
            .fetch_all(self.pool)
            .await?;

        let reservation_rows: Vec<ReservationRow> = sqlx::query_as(OWNED_RESERVATIONS)
            .bind(shoppable_ids)
            .bind(member_id)
            .bind(session_id)
            .fetch_all(self.pool)
            .await?;

        let mut consumables: HashMap<i32, Vec<Consumable>> = HashMap::new();
        for row in consumable_rows {
            consumables
                .entry(row.shoppable_id)
                .or_default()
                .push(row.into());
        }

        let mut reservations: HashMap<i32, Vec<Reservation>> = HashMap::new();
        for row in reservation_rows {
            reservations
                .entry(row.shoppable_id)
                .or_default()
                .push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let own_consumables = consumables.remove(&row.shoppable_id).unwrap_or_default();
                let own_reservations = reservations.remove(&row.shoppable_id).unwrap_or_default();
                let claimed_total = row.claimed_count;
                let committed_reservations_total = row.committed_count;

                Ok(TicketRecord {
                    ticket: row.into_ticket()?,
                    claimed_total,
                    committed_reservations_total,
                    own_consumables,
                    own_reservations,
                })
            })
            .collect()
    }
}
