//! Cadence Storage
//!
//! `SQLite` database layer for the Cadence media catalog.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each entity owns its own queries and invariants
//!   (`users`, `tracks`, `albums`, `playlists`)
//! - **Hydration**: `hydration` joins the slices into read-only composite views
//! - **Shared Handle**: every function borrows the long-lived pool; no slice
//!   keeps state of its own
//! - **Explicit Cascades**: deletions remove membership rows inside the same
//!   transaction, independent of foreign key enforcement
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::{create_pool, run_migrations, SqliteCatalog};
//! use cadence_core::CatalogStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadence.db").await?;
//! run_migrations(&pool).await?;
//!
//! let catalog = SqliteCatalog::new(pool);
//! let albums = catalog.get_all_albums().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod albums;
pub mod hydration;
pub mod playlists;
pub mod tracks;
pub mod users;

pub use context::SqliteCatalog;
pub use error::StorageError;

// Type alias used by the server state
pub type Database = SqliteCatalog;

/// Most `?` parameters bound into one `IN (...)` list.
/// Older SQLite builds cap a statement at 999.
pub(crate) const MAX_BIND_PARAMS: usize = 500;

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
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://cadence.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "creating sqlite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30)); // Wait up to 30s for locks

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!("sqlite pool ready");

    Ok(pool)
}
