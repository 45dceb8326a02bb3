//! Portable registry state
//!
//! A snapshot holds only the two owned tables: metadata in id order and
//! awards in award order. Every derived index is rebuilt on restore, so a
//! snapshot taken from any backend restores into an equivalent registry.
//!
//! # Example
//!
//! ```
//! use laurel_core::{Registry, RegistryConfig, RegistrySnapshot};
//!
//! let registry = Registry::new();
//! let text = registry.snapshot().to_ron().unwrap();
//! let restored =
//!     Registry::from_snapshot(RegistrySnapshot::from_ron(&text).unwrap(), &RegistryConfig::default())
//!         .unwrap();
//! assert_eq!(restored.metadata_count(), 0);
//! ```

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::registry::{Registry, RegistryState};
use crate::{AchievementMetadata, AwardRecord};
use serde::{Deserialize, Serialize};

/// Serializable copy of a registry's owned tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Definitions, ids `1..=len` in order
    pub metadata: Vec<AchievementMetadata>,
    /// Awards in the order they were committed
    pub awards: Vec<AwardRecord>,
}

impl RegistrySnapshot {
    /// Export to RON
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Import from RON
    pub fn from_ron(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }
}

impl RegistryState {
    /// Rebuild tables and indices, rejecting anything a live registry could
    /// never have produced
    pub(crate) fn rebuild(snapshot: RegistrySnapshot) -> Result<Self> {
        let mut state = RegistryState::default();

        for meta in snapshot.metadata {
            let expected = state.next_metadata_id();
            if meta.id != expected {
                return Err(Error::InvalidSnapshot(format!(
                    "expected {} but found {}",
                    expected, meta.id
                )));
            }
            meta.definition()
                .validate()
                .map_err(|e| Error::InvalidSnapshot(format!("{}: {}", meta.id, e)))?;
            state.metadata.push(meta);
        }

        for record in snapshot.awards {
            let meta = state.metadata(record.metadata_id).ok_or_else(|| {
                Error::InvalidSnapshot(format!("award references unknown {}", record.metadata_id))
            })?;
            let (owner, points) = (meta.owner.clone(), meta.points);

            if record.timestamp == 0 {
                return Err(Error::InvalidSnapshot(format!(
                    "award of {} to {} has no timestamp",
                    record.metadata_id, record.summoner_id
                )));
            }
            if state
                .awarded
                .contains(&(record.summoner_id, record.metadata_id))
            {
                return Err(Error::InvalidSnapshot(format!(
                    "{} awarded twice to {}",
                    record.metadata_id, record.summoner_id
                )));
            }
            state
                .check_points(record.summoner_id, record.metadata_id, points)
                .map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
            state.commit_award(record, owner, points);
        }

        Ok(state)
    }
}

impl Registry {
    /// Copy the owned tables out of the registry
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();
        RegistrySnapshot {
            metadata: state.metadata.clone(),
            awards: state.awards.clone(),
        }
    }

    /// Build a registry from a snapshot, recomputing every derived index
    pub fn from_snapshot(snapshot: RegistrySnapshot, config: &RegistryConfig) -> Result<Self> {
        let state = RegistryState::rebuild(snapshot).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected registry snapshot");
        })?;
        tracing::debug!(
            metadata = state.metadata.len(),
            awards = state.awards.len(),
            "restored registry snapshot"
        );
        Ok(Registry::from_state(state, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AchievementDefinition, AchievementLedger, Difficulty, IssuerId, MetadataId, SummonerId,
    };

    fn populated() -> Registry {
        let registry = Registry::new();
        let a = IssuerId::new("a");
        let b = IssuerId::new("b");
        let a1 = registry
            .register_achievement(
                &a,
                AchievementDefinition::new("A", Difficulty::Common, "one", "first", 5),
            )
            .unwrap();
        let b1 = registry
            .register_achievement(
                &b,
                AchievementDefinition::new("B", Difficulty::Epic, "two", "second", 50),
            )
            .unwrap();
        registry.award_achievement(&b, SummonerId::new(2), b1).unwrap();
        registry.award_achievement(&a, SummonerId::new(2), a1).unwrap();
        registry.award_achievement(&a, SummonerId::new(0), a1).unwrap();
        registry
    }

    #[test]
    fn test_restore_matches_original() {
        let original = populated();
        let text = original.snapshot().to_ron().unwrap();
        let restored =
            Registry::from_snapshot(RegistrySnapshot::from_ron(&text).unwrap(), &RegistryConfig::default())
                .unwrap();

        assert_eq!(restored.snapshot(), original.snapshot());
        for summoner in [0, 1, 2].map(SummonerId::new) {
            assert_eq!(
                restored.get_points(summoner, &[]).unwrap(),
                original.get_points(summoner, &[]).unwrap()
            );
            assert_eq!(
                restored.get_achievements(summoner, &[], 0, 0).unwrap(),
                original.get_achievements(summoner, &[], 0, 0).unwrap()
            );
        }
        assert!(restored.audit().is_consistent());
    }

    #[test]
    fn test_restored_registry_continues_ids() {
        let restored =
            Registry::from_snapshot(populated().snapshot(), &RegistryConfig::default()).unwrap();
        let next = restored
            .register_achievement(
                &IssuerId::new("c"),
                AchievementDefinition::new("C", Difficulty::Rare, "three", "third", 1),
            )
            .unwrap();
        assert_eq!(next, MetadataId::new(3));
    }

    #[test]
    fn test_rejects_gap_in_ids() {
        let mut snapshot = populated().snapshot();
        snapshot.metadata.remove(0);
        let err = Registry::from_snapshot(snapshot, &RegistryConfig::default()).err();
        assert!(matches!(err, Some(Error::InvalidSnapshot(_))));
    }

    #[test]
    fn test_rejects_duplicate_award() {
        let mut snapshot = populated().snapshot();
        let dup = snapshot.awards[0].clone();
        snapshot.awards.push(dup);
        let err = Registry::from_snapshot(snapshot, &RegistryConfig::default()).err();
        assert!(matches!(err, Some(Error::InvalidSnapshot(_))));
    }

    #[test]
    fn test_rejects_dangling_award_and_bad_metadata() {
        let mut snapshot = populated().snapshot();
        snapshot.awards[0].metadata_id = MetadataId::new(40);
        assert!(Registry::from_snapshot(snapshot, &RegistryConfig::default()).is_err());

        let mut snapshot = populated().snapshot();
        snapshot.metadata[1].points = 0;
        assert!(Registry::from_snapshot(snapshot, &RegistryConfig::default()).is_err());

        let mut snapshot = populated().snapshot();
        snapshot.awards[1].timestamp = 0;
        assert!(Registry::from_snapshot(snapshot, &RegistryConfig::default()).is_err());
    }

    #[test]
    fn test_rejects_overflowing_totals() {
        let mut snapshot = populated().snapshot();
        // Summoner 2 holds both definitions
        snapshot.metadata[0].points = u64::MAX;
        let err = Registry::from_snapshot(snapshot, &RegistryConfig::default()).err();
        assert!(matches!(err, Some(Error::InvalidSnapshot(_))));
    }
}
