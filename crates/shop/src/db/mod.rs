//! Database operations for the shop `PostgreSQL` database.
//!
//! # Tables
//!
//! - `events` - Events that tickets admit to
//! - `shoppables` - Generic purchasable entities (availability window, stock)
//! - `tickets` - Event admission specialization of shoppables
//! - `consumables` - Claims against shoppables (cart holds and purchases)
//! - `consumable_reservations` - Queue positions when stock is exhausted
//! - `tower_sessions.session` - Session storage (managed by the session store)
//!
//! All shop tables except sessions are read-only from this service; rows are
//! written by the cart/checkout collaborator and administrative flows.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/shop/migrations/` and run via:
//! ```bash
//! cargo run -p guildhall-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod events;
pub mod tickets;

pub use events::EventRepository;
pub use tickets::TicketRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
