//! Achievement definition models for database storage.

use crate::error::{Error, Result};
use laurel_core::{AchievementMetadata, Difficulty, IssuerId, MetadataId};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored achievement definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredMetadata {
    /// Primary key - metadata ID.
    #[primary_key]
    pub id: u64,
    /// Owning issuer.
    #[secondary_key]
    pub owner: String,
    /// Issuer display name.
    pub source_name: String,
    /// Raw difficulty tier.
    pub difficulty: u8,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Points granted on award.
    pub points: u64,
}

impl StoredMetadata {
    /// Create from registry metadata.
    pub fn from_metadata(meta: &AchievementMetadata) -> Self {
        Self {
            id: meta.id.raw(),
            owner: meta.owner.as_str().to_string(),
            source_name: meta.source_name.clone(),
            difficulty: meta.difficulty.as_u8(),
            title: meta.title.clone(),
            description: meta.description.clone(),
            points: meta.points,
        }
    }

    /// Convert to registry metadata.
    pub fn to_metadata(&self) -> Result<AchievementMetadata> {
        let difficulty = Difficulty::try_from(self.difficulty)
            .map_err(|e| Error::Serialization(format!("metadata {}: {}", self.id, e)))?;
        Ok(AchievementMetadata {
            id: MetadataId::new(self.id),
            owner: IssuerId::new(self.owner.clone()),
            source_name: self.source_name.clone(),
            difficulty,
            title: self.title.clone(),
            description: self.description.clone(),
            points: self.points,
        })
    }
}

/// Single row holding the id allocators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredCounter {
    /// Always "counters" - single row.
    #[primary_key]
    pub id: String,
    /// Id handed to the next registration.
    pub next_metadata_id: u64,
    /// Sequence number of the next award.
    pub next_award_seq: u64,
}

impl StoredCounter {
    /// Primary key of the single counter row.
    pub const KEY: &'static str = "counters";

    /// Allocators of an empty store.
    pub fn initial() -> Self {
        Self {
            id: Self::KEY.to_string(),
            next_metadata_id: MetadataId::FIRST.raw(),
            next_award_seq: 0,
        }
    }
}
