//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! gh-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_DATABASE_URL` - `PostgreSQL` connection string for the shop
//!   (falls back to `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while running migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Run the shop database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn shop() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = shop_database_url()?;

    tracing::info!("Connecting to shop database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running shop migrations...");
    sqlx::migrate!("../shop/migrations").run(&pool).await?;

    tracing::info!("Shop migrations complete!");
    Ok(())
}

pub(crate) fn shop_database_url() -> Result<String, MigrationError> {
    std::env::var("SHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("SHOP_DATABASE_URL"))
}
