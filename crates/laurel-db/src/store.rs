//! Database store wrapper.
//!
//! Every write operation runs in a single read-write transaction: the
//! checks, the award row, the subtotal and total rows and the counter row
//! are all committed together or not at all.

use crate::error::{Error, Result};
use crate::models::*;
use laurel_core::{
    paginate, AchievementDefinition, AchievementLedger, AchievementMetadata, AwardEntry,
    AwardEvent, AwardRecord, Clock, IssuerId, MetadataId, Notifier, OwnerFilter, Receiver,
    RegistryConfig, StorageConfig, SummonerId, SystemClock,
};
use native_db::*;
use std::path::Path;
use std::sync::{Arc, LazyLock};

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredMetadata>().unwrap();
    models.define::<StoredCounter>().unwrap();
    models.define::<StoredAward>().unwrap();
    models.define::<StoredSubtotal>().unwrap();
    models.define::<StoredTotal>().unwrap();
    models
});

/// Database store for persistent registry state.
pub struct Store {
    pub(crate) db: Database<'static>,
    clock: Arc<dyn Clock>,
    notifier: Notifier,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self::with_db(db, &RegistryConfig::default()))
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self::with_db(db, &RegistryConfig::default()))
    }

    /// Open the backend selected by a registry configuration.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let builder = Builder::new();
        let db = match &config.storage {
            StorageConfig::InMemory => builder.create_in_memory(&MODELS),
            StorageConfig::File(path) => builder.create(&MODELS, path),
        }
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self::with_db(db, config))
    }

    fn with_db(db: Database<'static>, config: &RegistryConfig) -> Self {
        Self {
            db,
            clock: Arc::new(SystemClock),
            notifier: Notifier::new(config.notify_capacity()),
        }
    }

    /// Replace the time source used for award timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Register a definition owned by `caller`.
    pub fn register(
        &self,
        caller: &IssuerId,
        definition: AchievementDefinition,
    ) -> Result<MetadataId> {
        // Reject before touching the database
        definition.validate()?;

        let rw = self.db.rw_transaction()?;
        let mut counter: StoredCounter = rw
            .get()
            .primary(StoredCounter::KEY.to_string())?
            .unwrap_or_else(StoredCounter::initial);

        let id = MetadataId::new(counter.next_metadata_id);
        let meta = AchievementMetadata::from_definition(id, caller.clone(), definition)?;
        rw.insert(StoredMetadata::from_metadata(&meta))?;

        counter.next_metadata_id += 1;
        rw.upsert(counter)?;
        rw.commit()?;

        tracing::debug!(caller = %caller, metadata = id.raw(), "registered achievement");
        Ok(id)
    }

    /// Award `metadata` to `summoner` on behalf of `caller`.
    pub fn award(
        &self,
        caller: &IssuerId,
        summoner: SummonerId,
        metadata: MetadataId,
    ) -> Result<AwardRecord> {
        let rw = self.db.rw_transaction()?;

        let meta: StoredMetadata = rw
            .get()
            .primary(metadata.raw())?
            .ok_or(laurel_core::Error::NotFound(metadata))?;
        if meta.owner != caller.as_str() {
            return Err(laurel_core::Error::Unauthorized {
                caller: caller.clone(),
                metadata,
            }
            .into());
        }

        let pair = StoredAward::pair_key(summoner, metadata);
        let existing: Option<StoredAward> = rw.get().secondary(StoredAwardKey::pair, pair.clone())?;
        if existing.is_some() {
            return Err(laurel_core::Error::Conflict { summoner, metadata }.into());
        }

        // Subtotals never exceed the total, so one check covers both
        let total: Option<StoredTotal> = rw.get().primary(summoner.raw())?;
        let total = total
            .map(|t| t.points)
            .unwrap_or(0)
            .checked_add(meta.points)
            .ok_or(laurel_core::Error::PointsOverflow { summoner, metadata })?;

        let mut counter: StoredCounter = rw
            .get()
            .primary(StoredCounter::KEY.to_string())?
            .unwrap_or_else(StoredCounter::initial);
        let seq = counter.next_award_seq;
        counter.next_award_seq += 1;

        let award = StoredAward {
            seq,
            pair,
            summoner_id: summoner.raw(),
            metadata_id: metadata.raw(),
            owner: meta.owner.clone(),
            points: meta.points,
            timestamp: self.clock.now().max(1),
        };
        let record = award.to_record();
        let owner = award.owner();
        rw.insert(award)?;

        let subtotal_key = StoredSubtotal::key(summoner, &owner);
        let subtotal: Option<StoredSubtotal> = rw.get().primary(subtotal_key.clone())?;
        rw.upsert(StoredSubtotal {
            key: subtotal_key,
            summoner_id: summoner.raw(),
            owner: meta.owner.clone(),
            points: subtotal
                .map(|s| s.points)
                .unwrap_or(0)
                .saturating_add(meta.points),
        })?;

        rw.upsert(StoredTotal {
            summoner_id: summoner.raw(),
            points: total,
        })?;

        rw.upsert(counter)?;
        rw.commit()?;

        tracing::info!(
            summoner = summoner.raw(),
            metadata = metadata.raw(),
            "awarded achievement"
        );
        self.notifier.publish(&AwardEvent::new(&record, owner));
        Ok(record)
    }

    /// Check whether a summoner holds an achievement.
    pub fn has(&self, summoner: SummonerId, metadata: MetadataId) -> Result<bool> {
        let r = self.db.r_transaction()?;
        let award: Option<StoredAward> = r
            .get()
            .secondary(StoredAwardKey::pair, StoredAward::pair_key(summoner, metadata))?;
        Ok(award.is_some())
    }

    /// Sum of a summoner's points, optionally restricted to some issuers.
    pub fn points(&self, summoner: SummonerId, owners: &[IssuerId]) -> Result<u64> {
        let filter = OwnerFilter::new(owners);
        let r = self.db.r_transaction()?;

        if filter.is_empty() {
            let total: Option<StoredTotal> = r.get().primary(summoner.raw())?;
            return Ok(total.map(|t| t.points).unwrap_or(0));
        }

        let mut points = 0;
        for owner in filter.owners() {
            let subtotal: Option<StoredSubtotal> =
                r.get().primary(StoredSubtotal::key(summoner, owner))?;
            points = subtotal
                .map(|s| s.points)
                .unwrap_or(0)
                .saturating_add(points);
        }
        Ok(points)
    }

    /// One page of a summoner's awards, resolved against their metadata.
    pub fn achievements(
        &self,
        summoner: SummonerId,
        owners: &[IssuerId],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<AwardEntry>> {
        let filter = OwnerFilter::new(owners);
        let mut awards: Vec<StoredAward> = self
            .awards_of(summoner)?
            .into_iter()
            .filter(|a| filter.matches(&a.owner()))
            .collect();
        awards.sort_by_key(|a| a.seq);
        let page = paginate(awards, offset, limit)?;

        let r = self.db.r_transaction()?;
        page.iter()
            .map(|award| -> Result<AwardEntry> {
                let meta: StoredMetadata = r
                    .get()
                    .primary(award.metadata_id)?
                    .ok_or(laurel_core::Error::NotFound(MetadataId::new(award.metadata_id)))?;
                Ok(AwardEntry::new(&award.to_record(), meta.to_metadata()?))
            })
            .collect()
    }

    /// Look up a registered definition.
    pub fn metadata(&self, metadata: MetadataId) -> Result<AchievementMetadata> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredMetadata> = r.get().primary(metadata.raw())?;
        stored
            .ok_or(laurel_core::Error::NotFound(metadata))?
            .to_metadata()
    }
}

impl AchievementLedger for Store {
    fn register_achievement(
        &self,
        caller: &IssuerId,
        definition: AchievementDefinition,
    ) -> laurel_core::Result<MetadataId> {
        Ok(self.register(caller, definition)?)
    }

    fn award_achievement(
        &self,
        caller: &IssuerId,
        summoner: SummonerId,
        metadata: MetadataId,
    ) -> laurel_core::Result<AwardRecord> {
        Ok(self.award(caller, summoner, metadata)?)
    }

    fn has_achievement(
        &self,
        summoner: SummonerId,
        metadata: MetadataId,
    ) -> laurel_core::Result<bool> {
        Ok(self.has(summoner, metadata)?)
    }

    fn get_points(&self, summoner: SummonerId, owners: &[IssuerId]) -> laurel_core::Result<u64> {
        Ok(self.points(summoner, owners)?)
    }

    fn get_achievements(
        &self,
        summoner: SummonerId,
        owners: &[IssuerId],
        offset: usize,
        limit: usize,
    ) -> laurel_core::Result<Vec<AwardEntry>> {
        Ok(self.achievements(summoner, owners, offset, limit)?)
    }

    fn get_metadata(&self, metadata: MetadataId) -> laurel_core::Result<AchievementMetadata> {
        Ok(self.metadata(metadata)?)
    }

    fn metadata_by_owner(
        &self,
        owner: &IssuerId,
    ) -> laurel_core::Result<Vec<AchievementMetadata>> {
        Ok(self.metadata_of(owner)?)
    }

    fn subscribe(&self) -> Receiver<AwardEvent> {
        self.notifier.subscribe()
    }
}
