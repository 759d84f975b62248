/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violated
    #[error("Duplicate {entity}: {value}")]
    Duplicate { entity: String, value: String },

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// A stored value could not be mapped back to a domain type
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a duplicate error
    pub fn duplicate(entity: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity: entity.into(),
            value: value.into(),
        }
    }
}

/// Whether a `SQLx` error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
