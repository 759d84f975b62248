//! Vibe Tuner Storage
//!
//! `SQLite` database layer for Vibe Tuner.
//!
//! This crate persists users, the emotion reference table, curated
//! collection mappings, emotion observations with their recommended tracks,
//! and answers the per-user analytics queries.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries and row mapping
//! - **Plain functions over a pool**: every operation takes `&SqlitePool`
//! - **Cascades in the schema**: deleting a user or an observation relies on
//!   `ON DELETE CASCADE`, so foreign keys are enabled on every connection
//!
//! # Example
//!
//! ```rust,no_run
//! use vibe_storage::{create_pool, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://vibe_tuner.db").await?;
//! run_migrations(&pool).await?;
//!
//! let labels = vibe_storage::emotion_types::get_all(&pool).await?;
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod analytics;
pub mod collections;
pub mod emotion_types;
pub mod observations;
pub mod users;

pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://vibe.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true) // Cascading deletes depend on this
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Convert a stored unix timestamp back to a UTC datetime
pub(crate) fn from_unix(secs: i64) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StorageError::Corrupt(format!("invalid timestamp {secs}")))
}
