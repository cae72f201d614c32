/// Storage-specific errors
use thiserror::Error;

/// Storage error types
///
/// Raised while opening the database; catalog operations report `CatalogError`.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection error
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for cadence_core::CatalogError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "storage setup failed");
        cadence_core::CatalogError::unavailable("storage is unavailable")
    }
}
