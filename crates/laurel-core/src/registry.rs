//! In-memory achievement registry
//!
//! State is split into two owned tables and a set of derived indices:
//!
//! ```text
//! RegistryState
//!  ├── metadata: Vec<AchievementMetadata>   (arena, id = index + 1)
//!  ├── awards:   Vec<AwardRecord>           (arena, award order)
//!  ├── awarded:  HashSet<(summoner, metadata)>
//!  └── summoners: IndexMap<SummonerId, SummonerIndex>
//!        ├── awards: Vec<usize>   (indices into `awards`)
//!        ├── total
//!        └── by_owner: HashMap<IssuerId, points>
//! ```
//!
//! The whole state sits behind one `RwLock`. Writers run their checks and
//! their commit under the write lock, and every fallible check happens
//! before the first mutation, so a rejected call leaves nothing behind.

use crate::award::{paginate, OwnerFilter};
use crate::clock::{Clock, SystemClock};
use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::ledger::AchievementLedger;
use crate::notify::{AwardEvent, Notifier};
use crate::{
    AchievementDefinition, AchievementMetadata, AwardEntry, AwardRecord, IssuerId, MetadataId,
    SummonerId,
};
use crossbeam_channel::Receiver;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Derived per-summoner view over the award table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SummonerIndex {
    /// Positions in `RegistryState::awards`, in award order
    pub(crate) awards: Vec<usize>,
    pub(crate) total: u64,
    pub(crate) by_owner: HashMap<IssuerId, u64>,
}

/// Tables and indices guarded by the registry lock
#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    pub(crate) metadata: Vec<AchievementMetadata>,
    pub(crate) awards: Vec<AwardRecord>,
    pub(crate) awarded: HashSet<(SummonerId, MetadataId)>,
    pub(crate) summoners: IndexMap<SummonerId, SummonerIndex>,
}

impl RegistryState {
    pub(crate) fn next_metadata_id(&self) -> MetadataId {
        MetadataId::new(self.metadata.len() as u64 + 1)
    }

    pub(crate) fn metadata(&self, id: MetadataId) -> Option<&AchievementMetadata> {
        let index = usize::try_from(id.raw().checked_sub(1)?).ok()?;
        self.metadata.get(index)
    }

    fn register(
        &mut self,
        caller: &IssuerId,
        definition: AchievementDefinition,
    ) -> Result<MetadataId> {
        let id = self.next_metadata_id();
        let metadata = AchievementMetadata::from_definition(id, caller.clone(), definition)?;
        self.metadata.push(metadata);
        Ok(id)
    }

    /// Run the award checks, returning the metadata to be awarded
    fn check_award(
        &self,
        caller: &IssuerId,
        summoner: SummonerId,
        metadata: MetadataId,
    ) -> Result<&AchievementMetadata> {
        let meta = self.metadata(metadata).ok_or(Error::NotFound(metadata))?;
        if !meta.is_owned_by(caller) {
            return Err(Error::Unauthorized {
                caller: caller.clone(),
                metadata,
            });
        }
        if self.awarded.contains(&(summoner, metadata)) {
            return Err(Error::Conflict { summoner, metadata });
        }
        self.check_points(summoner, metadata, meta.points)?;
        Ok(meta)
    }

    /// Reject an award whose points would overflow the summoner's total
    ///
    /// Every per-owner subtotal is bounded by the total, so checking the
    /// total covers both.
    pub(crate) fn check_points(
        &self,
        summoner: SummonerId,
        metadata: MetadataId,
        points: u64,
    ) -> Result<()> {
        let total = self.summoners.get(&summoner).map_or(0, |index| index.total);
        match total.checked_add(points) {
            Some(_) => Ok(()),
            None => Err(Error::PointsOverflow { summoner, metadata }),
        }
    }

    /// Append a record and update every derived index
    ///
    /// The record's metadata must exist, the pair must be unawarded and
    /// `check_points` must have passed.
    pub(crate) fn commit_award(&mut self, record: AwardRecord, owner: IssuerId, points: u64) {
        let position = self.awards.len();
        let pair = (record.summoner_id, record.metadata_id);

        let index = self.summoners.entry(record.summoner_id).or_default();
        index.awards.push(position);
        index.total = index.total.saturating_add(points);
        let subtotal = index.by_owner.entry(owner).or_insert(0);
        *subtotal = subtotal.saturating_add(points);

        self.awards.push(record);
        self.awarded.insert(pair);
    }

    fn points(&self, summoner: SummonerId, filter: &OwnerFilter<'_>) -> u64 {
        let Some(index) = self.summoners.get(&summoner) else {
            return 0;
        };
        if filter.is_empty() {
            return index.total;
        }
        filter
            .owners()
            .filter_map(|owner| index.by_owner.get(owner))
            .fold(0, |sum, points| sum.saturating_add(*points))
    }

    fn entries(&self, summoner: SummonerId, filter: &OwnerFilter<'_>) -> Vec<AwardEntry> {
        let Some(index) = self.summoners.get(&summoner) else {
            return Vec::new();
        };
        index
            .awards
            .iter()
            .filter_map(|&position| {
                let record = self.awards.get(position)?;
                let meta = self.metadata(record.metadata_id)?;
                filter
                    .matches(&meta.owner)
                    .then(|| AwardEntry::new(record, meta.clone()))
            })
            .collect()
    }
}

/// Thread-safe in-memory achievement registry
///
/// ```
/// use laurel_core::{
///     AchievementDefinition, AchievementLedger, Difficulty, IssuerId, Registry, SummonerId,
/// };
///
/// let registry = Registry::new();
/// let dungeon = IssuerId::new("fantom-dungeon");
/// let id = registry
///     .register_achievement(
///         &dungeon,
///         AchievementDefinition::new("The Fantom Dungeon", Difficulty::Common, "First blood", "Defeat a monster", 5),
///     )
///     .unwrap();
///
/// registry.award_achievement(&dungeon, SummonerId::new(0), id).unwrap();
/// assert_eq!(registry.get_points(SummonerId::new(0), &[]).unwrap(), 5);
/// ```
pub struct Registry {
    pub(crate) state: RwLock<RegistryState>,
    clock: Arc<dyn Clock>,
    notifier: Notifier,
}

impl Registry {
    /// Create an empty registry using the wall clock
    pub fn new() -> Self {
        Self::with_config(&RegistryConfig::default())
    }

    /// Create an empty registry from a configuration
    ///
    /// The storage selection is ignored; this registry always lives in memory.
    pub fn with_config(config: &RegistryConfig) -> Self {
        Self::from_state(RegistryState::default(), config)
    }

    pub(crate) fn from_state(state: RegistryState, config: &RegistryConfig) -> Self {
        Self {
            state: RwLock::new(state),
            clock: Arc::new(SystemClock),
            notifier: Notifier::new(config.notify_capacity()),
        }
    }

    /// Replace the time source used for award timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Number of registered definitions
    pub fn metadata_count(&self) -> usize {
        self.state.read().metadata.len()
    }

    /// Number of committed awards across all summoners
    pub fn award_count(&self) -> usize {
        self.state.read().awards.len()
    }

    /// Number of summoners holding at least one award
    pub fn summoner_count(&self) -> usize {
        self.state.read().summoners.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementLedger for Registry {
    fn register_achievement(
        &self,
        caller: &IssuerId,
        definition: AchievementDefinition,
    ) -> Result<MetadataId> {
        let id = self.state.write().register(caller, definition)?;
        tracing::debug!(caller = %caller, metadata = id.raw(), "registered achievement");
        Ok(id)
    }

    fn award_achievement(
        &self,
        caller: &IssuerId,
        summoner: SummonerId,
        metadata: MetadataId,
    ) -> Result<AwardRecord> {
        let (record, owner) = {
            let mut state = self.state.write();
            let meta = state.check_award(caller, summoner, metadata)?;
            let (owner, points) = (meta.owner.clone(), meta.points);

            let record = AwardRecord {
                summoner_id: summoner,
                metadata_id: metadata,
                timestamp: self.clock.now().max(1),
            };
            state.commit_award(record.clone(), owner.clone(), points);
            (record, owner)
        };

        tracing::info!(
            summoner = summoner.raw(),
            metadata = metadata.raw(),
            "awarded achievement"
        );
        self.notifier.publish(&AwardEvent::new(&record, owner));
        Ok(record)
    }

    fn has_achievement(&self, summoner: SummonerId, metadata: MetadataId) -> Result<bool> {
        Ok(self.state.read().awarded.contains(&(summoner, metadata)))
    }

    fn get_points(&self, summoner: SummonerId, owners: &[IssuerId]) -> Result<u64> {
        let filter = OwnerFilter::new(owners);
        Ok(self.state.read().points(summoner, &filter))
    }

    fn get_achievements(
        &self,
        summoner: SummonerId,
        owners: &[IssuerId],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<AwardEntry>> {
        let filter = OwnerFilter::new(owners);
        let entries = self.state.read().entries(summoner, &filter);
        paginate(entries, offset, limit)
    }

    fn get_metadata(&self, metadata: MetadataId) -> Result<AchievementMetadata> {
        self.state
            .read()
            .metadata(metadata)
            .cloned()
            .ok_or(Error::NotFound(metadata))
    }

    fn metadata_by_owner(&self, owner: &IssuerId) -> Result<Vec<AchievementMetadata>> {
        Ok(self
            .state
            .read()
            .metadata
            .iter()
            .filter(|meta| meta.is_owned_by(owner))
            .cloned()
            .collect())
    }

    fn subscribe(&self) -> Receiver<AwardEvent> {
        self.notifier.subscribe()
    }
}
