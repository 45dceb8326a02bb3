//! Issuer catalog schema
//!
//! A catalog is the set of achievements one issuer ships, keyed by a short
//! name the issuer uses in its own code:
//!
//! ```ron
//! (
//!     source_name: "The Fantom Dungeon",
//!     achievements: [
//!         (key: "first_monster", difficulty: 0, title: "Defeated first monster",
//!          description: "...", points: 5),
//!     ],
//! )
//! ```

use crate::error::{Error, Result};
use indexmap::IndexMap;
use laurel_core::{
    AchievementDefinition, AchievementLedger, AwardRecord, IssuerId, MetadataId, SummonerId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One achievement entry in a catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDef {
    /// Issuer-local name of the achievement
    pub key: String,
    /// Raw difficulty tier
    #[serde(default)]
    pub difficulty: u8,
    pub title: String,
    pub description: String,
    pub points: u64,
}

/// Achievements shipped by one issuer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Display name recorded on every definition
    pub source_name: String,
    pub achievements: Vec<AchievementDef>,
}

impl Catalog {
    /// Parse a catalog from RON text
    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Registry definition for one entry
    pub fn definition(&self, def: &AchievementDef) -> AchievementDefinition {
        AchievementDefinition {
            source_name: self.source_name.clone(),
            difficulty: def.difficulty,
            title: def.title.clone(),
            description: def.description.clone(),
            points: def.points,
        }
    }

    /// Check keys are unique and every entry passes registry validation
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for def in &self.achievements {
            if !seen.insert(def.key.as_str()) {
                return Err(Error::DuplicateDefinition(def.key.clone()));
            }
            self.definition(def)
                .validate()
                .map_err(|source| Error::InvalidDefinition {
                    key: def.key.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Register every entry on behalf of `issuer`
    ///
    /// The whole catalog is validated first, so a bad entry registers nothing.
    pub fn register(
        &self,
        ledger: &dyn AchievementLedger,
        issuer: &IssuerId,
    ) -> Result<RegisteredCatalog> {
        self.validate()?;

        let mut ids = IndexMap::new();
        for def in &self.achievements {
            let id = ledger.register_achievement(issuer, self.definition(def))?;
            ids.insert(def.key.clone(), id);
        }

        tracing::info!(
            issuer = %issuer,
            source = %self.source_name,
            count = ids.len(),
            "registered catalog"
        );
        Ok(RegisteredCatalog {
            issuer: issuer.clone(),
            ids,
        })
    }
}

/// A catalog after registration: issuer keys mapped to registry ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredCatalog {
    pub issuer: IssuerId,
    /// Keys in catalog order
    pub ids: IndexMap<String, MetadataId>,
}

impl RegisteredCatalog {
    /// Registry id of a catalog key
    pub fn id(&self, key: &str) -> Result<MetadataId> {
        self.ids
            .get(key)
            .copied()
            .ok_or_else(|| Error::UnknownKey(key.to_string()))
    }

    /// Award the achievement named `key` to `summoner`
    pub fn award(
        &self,
        ledger: &dyn AchievementLedger,
        summoner: SummonerId,
        key: &str,
    ) -> Result<AwardRecord> {
        let id = self.id(key)?;
        Ok(ledger.award_achievement(&self.issuer, summoner, id)?)
    }

    /// Points `summoner` holds from this issuer
    pub fn points(&self, ledger: &dyn AchievementLedger, summoner: SummonerId) -> Result<u64> {
        Ok(ledger.get_points(summoner, std::slice::from_ref(&self.issuer))?)
    }
}
