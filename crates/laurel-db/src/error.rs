//! Error types for database operations.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Registry rule violation (validation, ownership, duplicates, ranges).
    #[error(transparent)]
    Registry(#[from] laurel_core::Error),

    /// Import into a store that already holds data.
    #[error("Store is not empty: {0}")]
    NotEmpty(String),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<laurel_core::ValidationError> for Error {
    fn from(err: laurel_core::ValidationError) -> Self {
        Error::Registry(err.into())
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<Error> for laurel_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Registry(inner) => inner,
            other => laurel_core::Error::Storage(other.to_string()),
        }
    }
}
