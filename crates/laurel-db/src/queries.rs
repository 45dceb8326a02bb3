//! Common query patterns for the database.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::Store;
use laurel_core::{
    AchievementMetadata, IssuerId, Registry, RegistryConfig, RegistrySnapshot, SummonerId,
};
use std::collections::HashMap;

impl Store {
    /// Get all award rows of a summoner, in storage order.
    pub(crate) fn awards_of(&self, summoner: SummonerId) -> Result<Vec<StoredAward>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredAward>(StoredAwardKey::summoner_id)?;
        let iter = scan.start_with(summoner.raw())?;
        let awards: std::result::Result<Vec<StoredAward>, _> = iter.collect();
        awards.map_err(|e| Error::Database(e.to_string()))
    }

    /// Get a summoner's points broken down by issuer, in issuer order.
    pub fn points_by_issuer(&self, summoner: SummonerId) -> Result<Vec<(IssuerId, u64)>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredSubtotal>(StoredSubtotalKey::summoner_id)?;
        let iter = scan.start_with(summoner.raw())?;
        let subtotals: std::result::Result<Vec<StoredSubtotal>, _> = iter.collect();
        let subtotals = subtotals.map_err(|e| Error::Database(e.to_string()))?;

        let mut points: Vec<_> = subtotals
            .into_iter()
            .map(|s| (IssuerId::new(s.owner), s.points))
            .collect();
        points.sort();
        Ok(points)
    }

    /// Get every definition registered by one issuer, in id order.
    pub fn metadata_of(&self, owner: &IssuerId) -> Result<Vec<AchievementMetadata>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredMetadata>(StoredMetadataKey::owner)?;
        let iter = scan.start_with(owner.as_str().to_string())?;
        let stored: std::result::Result<Vec<StoredMetadata>, _> = iter.collect();
        let mut stored = stored.map_err(|e| Error::Database(e.to_string()))?;

        // Prefix scan: "a" also matches "ab"
        stored.retain(|m| m.owner == owner.as_str());
        stored.sort_by_key(|m| m.id);
        stored.iter().map(StoredMetadata::to_metadata).collect()
    }

    /// Get all definitions, in id order.
    pub fn all_metadata(&self) -> Result<Vec<AchievementMetadata>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredMetadata>()?;
        let iter = scan.all()?;
        let stored: std::result::Result<Vec<StoredMetadata>, _> = iter.collect();
        let mut stored = stored.map_err(|e| Error::Database(e.to_string()))?;
        stored.sort_by_key(|m| m.id);
        stored.iter().map(StoredMetadata::to_metadata).collect()
    }

    /// Get all award rows, in award order.
    pub fn all_awards(&self) -> Result<Vec<StoredAward>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredAward>()?;
        let iter = scan.all()?;
        let awards: std::result::Result<Vec<StoredAward>, _> = iter.collect();
        let mut awards = awards.map_err(|e| Error::Database(e.to_string()))?;
        awards.sort_by_key(|a| a.seq);
        Ok(awards)
    }

    /// Count committed awards.
    pub fn award_count(&self) -> Result<usize> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredAward>()?;
        let iter = scan.all()?;
        Ok(iter.count())
    }

    /// Copy the owned tables out of the store.
    pub fn snapshot(&self) -> Result<RegistrySnapshot> {
        Ok(RegistrySnapshot {
            metadata: self.all_metadata()?,
            awards: self
                .all_awards()?
                .iter()
                .map(StoredAward::to_record)
                .collect(),
        })
    }

    /// Rebuild an in-memory registry from the persisted tables.
    pub fn load_registry(&self, config: &RegistryConfig) -> Result<Registry> {
        Ok(Registry::from_snapshot(self.snapshot()?, config)?)
    }

    /// Load a snapshot into an empty store.
    ///
    /// The snapshot is checked by restoring it in memory first; all rows are
    /// then written in one transaction.
    pub fn import(&self, snapshot: &RegistrySnapshot) -> Result<()> {
        Registry::from_snapshot(snapshot.clone(), &RegistryConfig::default())?;

        let by_id: HashMap<u64, &AchievementMetadata> =
            snapshot.metadata.iter().map(|m| (m.id.raw(), m)).collect();
        let mut subtotals: HashMap<(SummonerId, IssuerId), u64> = HashMap::new();
        let mut totals: HashMap<SummonerId, u64> = HashMap::new();

        let rw = self.db.rw_transaction()?;
        // The counter row is written by the first registration
        let counter: Option<StoredCounter> = rw.get().primary(StoredCounter::KEY.to_string())?;
        if counter.is_some() {
            return Err(Error::NotEmpty("import requires an empty store".to_string()));
        }
        for meta in &snapshot.metadata {
            rw.insert(StoredMetadata::from_metadata(meta))?;
        }
        for (seq, record) in snapshot.awards.iter().enumerate() {
            let meta = by_id.get(&record.metadata_id.raw()).ok_or_else(|| {
                laurel_core::Error::NotFound(record.metadata_id)
            })?;
            rw.insert(StoredAward {
                seq: seq as u64,
                pair: StoredAward::pair_key(record.summoner_id, record.metadata_id),
                summoner_id: record.summoner_id.raw(),
                metadata_id: record.metadata_id.raw(),
                owner: meta.owner.as_str().to_string(),
                points: meta.points,
                timestamp: record.timestamp,
            })?;
            // The in-memory restore above already rejected overflowing totals
            let subtotal = subtotals
                .entry((record.summoner_id, meta.owner.clone()))
                .or_insert(0);
            *subtotal = subtotal.saturating_add(meta.points);
            let total = totals.entry(record.summoner_id).or_insert(0);
            *total = total.saturating_add(meta.points);
        }
        for ((summoner, owner), points) in subtotals {
            rw.insert(StoredSubtotal {
                key: StoredSubtotal::key(summoner, &owner),
                summoner_id: summoner.raw(),
                owner: owner.as_str().to_string(),
                points,
            })?;
        }
        for (summoner, points) in totals {
            rw.insert(StoredTotal {
                summoner_id: summoner.raw(),
                points,
            })?;
        }
        rw.upsert(StoredCounter {
            id: StoredCounter::KEY.to_string(),
            next_metadata_id: snapshot.metadata.len() as u64 + 1,
            next_award_seq: snapshot.awards.len() as u64,
        })?;
        rw.commit()?;

        tracing::info!(
            metadata = snapshot.metadata.len(),
            awards = snapshot.awards.len(),
            "imported registry snapshot"
        );
        Ok(())
    }
}
