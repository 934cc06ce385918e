//! Demo data seeding.
//!
//! Inserts a published demo event with two tickets so the shop API has
//! something to serve in a fresh development database.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use guildhall_core::CurrencyCode;

use super::migrate::{MigrationError, shop_database_url};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Env(#[from] MigrationError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Seed the shop database with a demo event and tickets.
///
/// # Errors
///
/// Returns `SeedError` if the database URL is missing or an insert fails.
pub async fn demo_data() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = shop_database_url()?;
    let pool = PgPool::connect(&database_url).await?;

    let now = Utc::now();

    tracing::info!("Seeding demo event...");
    let event_id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO events (name, description, location, starts_at, ends_at, tags, published)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE)
        RETURNING id
        ",
    )
    .bind("Autumn Gasque")
    .bind("Three-course dinner followed by an afterparty in the cellar.")
    .bind("Great Hall")
    .bind(now + Duration::days(30))
    .bind(now + Duration::days(30) + Duration::hours(6))
    .bind(vec!["formal".to_string(), "dinner".to_string()])
    .fetch_one(&pool)
    .await?;

    seed_ticket(
        &pool,
        event_id,
        "Member ticket",
        Decimal::new(35000, 2),
        120,
        2,
        now,
    )
    .await?;
    seed_ticket(
        &pool,
        event_id,
        "Guest ticket",
        Decimal::new(45000, 2),
        40,
        1,
        now,
    )
    .await?;

    tracing::info!("Demo data seeded (event id {event_id})");
    Ok(())
}

async fn seed_ticket(
    pool: &PgPool,
    event_id: i32,
    name: &str,
    price: Decimal,
    stock: i32,
    max_amount_per_user: i32,
    now: chrono::DateTime<Utc>,
) -> Result<(), SeedError> {
    let shoppable_id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO shoppables (name, price, currency, stock, available_from, available_to)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        ",
    )
    .bind(name)
    .bind(price)
    .bind(CurrencyCode::SEK.as_str())
    .bind(stock)
    .bind(now)
    .bind(now + Duration::days(28))
    .fetch_one(pool)
    .await?;

    sqlx::query(
        r"
        INSERT INTO tickets (shoppable_id, event_id, max_amount_per_user)
        VALUES ($1, $2, $3)
        ",
    )
    .bind(shoppable_id)
    .bind(event_id)
    .bind(max_amount_per_user)
    .execute(pool)
    .await?;

    Ok(())
}
