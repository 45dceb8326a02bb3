//! The call surface shared by every registry backend
//!
//! Issuer services use the two write operations; read clients use the
//! queries. Every call is atomic with respect to every other call on the
//! same instance.

use crate::error::Result;
use crate::{
    AchievementDefinition, AchievementMetadata, AwardEntry, AwardEvent, AwardRecord, IssuerId,
    MetadataId, SummonerId,
};
use crossbeam_channel::Receiver;

/// Achievement registry operations
pub trait AchievementLedger {
    /// Validate and store a definition owned by `caller`, returning its new id
    fn register_achievement(
        &self,
        caller: &IssuerId,
        definition: AchievementDefinition,
    ) -> Result<MetadataId>;

    /// Grant `metadata` to `summoner`, at most once per pair
    ///
    /// Fails with `NotFound`, then `Unauthorized` (caller is not the
    /// owner), then `Conflict` (already awarded), in that order.
    fn award_achievement(
        &self,
        caller: &IssuerId,
        summoner: SummonerId,
        metadata: MetadataId,
    ) -> Result<AwardRecord>;

    /// Check whether `summoner` holds `metadata`
    fn has_achievement(&self, summoner: SummonerId, metadata: MetadataId) -> Result<bool>;

    /// Sum of points held by `summoner`, restricted to `owners` when non-empty
    fn get_points(&self, summoner: SummonerId, owners: &[IssuerId]) -> Result<u64>;

    /// One page of `summoner`'s awards in award order
    ///
    /// `limit == 0` means no cap. An `offset` past the filtered count fails
    /// with `OutOfRange`.
    fn get_achievements(
        &self,
        summoner: SummonerId,
        owners: &[IssuerId],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<AwardEntry>>;

    /// Look up a registered definition
    fn get_metadata(&self, metadata: MetadataId) -> Result<AchievementMetadata>;

    /// Every definition registered by `owner`, in id order
    fn metadata_by_owner(&self, owner: &IssuerId) -> Result<Vec<AchievementMetadata>>;

    /// Receive an [`AwardEvent`] for every award committed from now on
    fn subscribe(&self) -> Receiver<AwardEvent>;
}
