//! Achievement definitions and their validation

use crate::error::ValidationError;
use crate::{IssuerId, MetadataId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of difficulty tiers an achievement can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Common,
    Uncommon,
    Rare,
    Epic,
}

impl Difficulty {
    /// Every tier, lowest first
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Common,
        Difficulty::Uncommon,
        Difficulty::Rare,
        Difficulty::Epic,
    ];

    /// Raw wire value of this tier
    pub fn as_u8(&self) -> u8 {
        match self {
            Difficulty::Common => 0,
            Difficulty::Uncommon => 1,
            Difficulty::Rare => 2,
            Difficulty::Epic => 3,
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = ValidationError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Difficulty::Common),
            1 => Ok(Difficulty::Uncommon),
            2 => Ok(Difficulty::Rare),
            3 => Ok(Difficulty::Epic),
            other => Err(ValidationError::InvalidDifficulty(other)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Common => "common",
            Difficulty::Uncommon => "uncommon",
            Difficulty::Rare => "rare",
            Difficulty::Epic => "epic",
        };
        write!(f, "{}", name)
    }
}

/// An achievement definition as submitted by an issuer
///
/// `difficulty` is kept as the raw tier value so that an out-of-range tier
/// surfaces as [`ValidationError::InvalidDifficulty`] instead of a decode
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    /// Display name of the issuer
    pub source_name: String,
    /// Raw difficulty tier
    pub difficulty: u8,
    /// Short title
    pub title: String,
    /// Longer description
    pub description: String,
    /// Points granted on award
    pub points: u64,
}

impl AchievementDefinition {
    /// Create a new definition
    pub fn new(
        source_name: impl Into<String>,
        difficulty: Difficulty,
        title: impl Into<String>,
        description: impl Into<String>,
        points: u64,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            difficulty: difficulty.as_u8(),
            title: title.into(),
            description: description.into(),
            points,
        }
    }

    /// Check every field, returning the validated difficulty tier
    pub fn validate(&self) -> Result<Difficulty, ValidationError> {
        let difficulty = Difficulty::try_from(self.difficulty)?;
        if self.source_name.is_empty() {
            return Err(ValidationError::SourceNameRequired);
        }
        if self.title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        if self.description.is_empty() {
            return Err(ValidationError::DescriptionRequired);
        }
        if self.points == 0 {
            return Err(ValidationError::PointsNotPositive);
        }
        Ok(difficulty)
    }
}

/// A registered achievement definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementMetadata {
    pub id: MetadataId,
    /// The only issuer allowed to award this achievement
    pub owner: IssuerId,
    pub source_name: String,
    pub difficulty: Difficulty,
    pub title: String,
    pub description: String,
    pub points: u64,
}

impl AchievementMetadata {
    /// Validate a definition and bind it to an id and owner
    pub fn from_definition(
        id: MetadataId,
        owner: IssuerId,
        definition: AchievementDefinition,
    ) -> Result<Self, ValidationError> {
        let difficulty = definition.validate()?;
        Ok(Self {
            id,
            owner,
            source_name: definition.source_name,
            difficulty,
            title: definition.title,
            description: definition.description,
            points: definition.points,
        })
    }

    /// The definition this metadata was registered from
    pub fn definition(&self) -> AchievementDefinition {
        AchievementDefinition {
            source_name: self.source_name.clone(),
            difficulty: self.difficulty.as_u8(),
            title: self.title.clone(),
            description: self.description.clone(),
            points: self.points,
        }
    }

    /// Check whether `caller` owns this achievement
    pub fn is_owned_by(&self, caller: &IssuerId) -> bool {
        &self.owner == caller
    }
}
