//! Identity types for issuers, summoners and achievement metadata

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated identity of a caller that registers and awards achievements
///
/// The registry never interprets the value; it is compared for equality
/// against the owner stored on each metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuerId(pub String);

impl IssuerId {
    /// Create a new issuer ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssuerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "issuer:{}", self.0)
    }
}

impl From<&str> for IssuerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for IssuerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Opaque identifier of a player avatar, minted by an external system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SummonerId(pub u64);

impl SummonerId {
    /// Create a new summoner ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SummonerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "summoner:{}", self.0)
    }
}

/// Registry-assigned identifier of an achievement definition
///
/// Ids start at 1 and are handed out sequentially; 0 never names a
/// registered definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetadataId(pub u64);

impl MetadataId {
    /// The first id handed out by an empty registry
    pub const FIRST: MetadataId = MetadataId(1);

    /// Create a new metadata ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// The id allocated right after this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MetadataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "metadata:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_id() {
        let id = IssuerId::new("fantom-dungeon");
        assert_eq!(id.as_str(), "fantom-dungeon");
        assert_eq!(format!("{}", id), "issuer:fantom-dungeon");
        assert_eq!(IssuerId::from("a"), IssuerId::from("a".to_string()));
    }

    #[test]
    fn test_summoner_id() {
        let id = SummonerId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "summoner:42");
    }

    #[test]
    fn test_metadata_id_sequence() {
        assert_eq!(MetadataId::FIRST.raw(), 1);
        assert_eq!(MetadataId::FIRST.next(), MetadataId::new(2));
        assert_eq!(format!("{}", MetadataId::new(7)), "metadata:7");
    }
}
