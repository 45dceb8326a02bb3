//! Error types for laurel-script

use laurel_core::ValidationError;
use thiserror::Error;

/// Catalog loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Duplicate definition: {0}")]
    DuplicateDefinition(String),

    #[error("Invalid definition {key}: {source}")]
    InvalidDefinition {
        key: String,
        source: ValidationError,
    },

    #[error("Unknown achievement key: {0}")]
    UnknownKey(String),

    #[error("Registry error: {0}")]
    Registry(#[from] laurel_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
