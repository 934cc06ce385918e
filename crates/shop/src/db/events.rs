//! Event repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use guildhall_core::EventId;

use super::RepositoryError;
use crate::models::{Event, EventFilter, EventSummary};

const EVENT_COLUMNS: &str = r"
    id, name, description, location, starts_at, ends_at, tags,
    published, deleted_at, created_at, updated_at
";

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: i32,
    name: String,
    description: Option<String>,
    location: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
    tags: Vec<String>,
    published: bool,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::new(row.id),
            name: row.name,
            description: row.description,
            location: row.location,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            tags: row.tags,
            published: row.published,
            deleted_at: row.deleted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for event database operations.
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List published, non-deleted events matching the caller's filters,
    /// ordered by start time ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(
        &self,
        filter: &EventFilter,
    ) -> Result<Vec<Event>, RepositoryError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS}
             FROM events
             WHERE published AND deleted_at IS NULL
               AND ($1::timestamptz IS NULL OR starts_at >= $1)
               AND ($2::timestamptz IS NULL OR starts_at <= $2)
             ORDER BY starts_at ASC"
        );
        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .bind(filter.starts_after)
            .bind(filter.starts_before)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// Get the minimal summary of one event by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(&self, id: EventId) -> Result<Option<EventSummary>, RepositoryError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(|row| Event::from(row).summary()))
    }
}
