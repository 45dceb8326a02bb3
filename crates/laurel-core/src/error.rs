//! Error types for laurel-core

use crate::{IssuerId, MetadataId, SummonerId};
use thiserror::Error;

/// Rejection reasons for a malformed achievement definition
///
/// Checked in declaration order; the first failing rule wins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid difficulty: {0}")]
    InvalidDifficulty(u8),

    #[error("source name required")]
    SourceNameRequired,

    #[error("title required")]
    TitleRequired,

    #[error("description required")]
    DescriptionRequired,

    #[error("points must be positive")]
    PointsNotPositive,
}

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("requested metadata does not exist: {0}")]
    NotFound(MetadataId),

    #[error("caller is not the owner of the metadata: {caller} on {metadata}")]
    Unauthorized {
        caller: IssuerId,
        metadata: MetadataId,
    },

    #[error("summoner already owns the achievement: {summoner} has {metadata}")]
    Conflict {
        summoner: SummonerId,
        metadata: MetadataId,
    },

    #[error("point total would overflow: {summoner} awarded {metadata}")]
    PointsOverflow {
        summoner: SummonerId,
        metadata: MetadataId,
    },

    #[error("offset exceeds available records: offset {offset}, available {available}")]
    OutOfRange { offset: usize, available: usize },

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::from(ValidationError::TitleRequired);
        assert_eq!(err.to_string(), "validation error: title required");

        let err = Error::OutOfRange {
            offset: 4,
            available: 3,
        };
        assert!(err.to_string().starts_with("offset exceeds available records"));

        let err = Error::Unauthorized {
            caller: IssuerId::new("b"),
            metadata: MetadataId::new(1),
        };
        assert!(err.to_string().contains("issuer:b"));
    }
}
