//! Award models for database storage.
//!
//! Owner and points are copied from the metadata into each award row.
//! Metadata never changes after registration, so the copies cannot go stale,
//! and filtered queries never need a join.

use laurel_core::{AwardRecord, IssuerId, MetadataId, SummonerId};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored award.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 10, version = 1)]
#[native_db]
pub struct StoredAward {
    /// Primary key - global award sequence, i.e. award order.
    #[primary_key]
    pub seq: u64,
    /// Summoner/metadata pair; at most one award per pair.
    #[secondary_key(unique)]
    pub pair: String,
    /// Awarded summoner.
    #[secondary_key]
    pub summoner_id: u64,
    /// Awarded metadata.
    pub metadata_id: u64,
    /// Owner of the metadata.
    pub owner: String,
    /// Points of the metadata.
    pub points: u64,
    /// Award instant.
    pub timestamp: u64,
}

impl StoredAward {
    /// Unique key of a summoner/metadata pair.
    pub fn pair_key(summoner: SummonerId, metadata: MetadataId) -> String {
        format!("{}:{}", summoner.raw(), metadata.raw())
    }

    /// Convert to an award record.
    pub fn to_record(&self) -> AwardRecord {
        AwardRecord {
            summoner_id: SummonerId::new(self.summoner_id),
            metadata_id: MetadataId::new(self.metadata_id),
            timestamp: self.timestamp,
        }
    }

    /// Owning issuer of the awarded metadata.
    pub fn owner(&self) -> IssuerId {
        IssuerId::new(self.owner.clone())
    }
}

/// Points one summoner holds from one issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 11, version = 1)]
#[native_db]
pub struct StoredSubtotal {
    /// Primary key - composite of summoner and owner.
    #[primary_key]
    pub key: String,
    /// Summoner.
    #[secondary_key]
    pub summoner_id: u64,
    /// Issuer.
    pub owner: String,
    /// Points.
    pub points: u64,
}

impl StoredSubtotal {
    /// Primary key for a summoner/owner pair.
    pub fn key(summoner: SummonerId, owner: &IssuerId) -> String {
        format!("{}/{}", summoner.raw(), owner.as_str())
    }
}

/// Points one summoner holds across every issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 12, version = 1)]
#[native_db]
pub struct StoredTotal {
    /// Primary key - summoner ID.
    #[primary_key]
    pub summoner_id: u64,
    /// Points.
    pub points: u64,
}
