//! Award records, resolved listing entries and query helpers

use crate::error::{Error, Result};
use crate::{AchievementMetadata, IssuerId, MetadataId, SummonerId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One grant of an achievement to a summoner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardRecord {
    pub summoner_id: SummonerId,
    pub metadata_id: MetadataId,
    /// Seconds since the Unix epoch, always greater than zero
    pub timestamp: u64,
}

/// An award joined with the metadata it refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardEntry {
    pub summoner_id: SummonerId,
    pub timestamp: u64,
    pub metadata: AchievementMetadata,
}

impl AwardEntry {
    /// Join a record with its resolved metadata
    pub fn new(record: &AwardRecord, metadata: AchievementMetadata) -> Self {
        Self {
            summoner_id: record.summoner_id,
            timestamp: record.timestamp,
            metadata,
        }
    }

    /// The underlying award record
    pub fn record(&self) -> AwardRecord {
        AwardRecord {
            summoner_id: self.summoner_id,
            metadata_id: self.metadata.id,
            timestamp: self.timestamp,
        }
    }
}

/// Set of issuers restricting point and listing queries
///
/// An empty filter matches every issuer. Repeated issuers collapse.
#[derive(Debug, Clone, Default)]
pub struct OwnerFilter<'a> {
    owners: HashSet<&'a IssuerId>,
}

impl<'a> OwnerFilter<'a> {
    /// Build a filter from a list of issuers
    pub fn new(owners: &'a [IssuerId]) -> Self {
        Self {
            owners: owners.iter().collect(),
        }
    }

    /// Check whether the filter lets every issuer through
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Check whether records owned by `owner` pass the filter
    pub fn matches(&self, owner: &IssuerId) -> bool {
        self.owners.is_empty() || self.owners.contains(owner)
    }

    /// The distinct issuers in the filter
    pub fn owners(&self) -> impl Iterator<Item = &'a IssuerId> + '_ {
        self.owners.iter().copied()
    }
}

/// Cut one page out of an ordered, already filtered list
///
/// `offset == items.len()` yields an empty page, larger offsets fail with
/// [`Error::OutOfRange`]. A `limit` of 0 returns everything after `offset`.
pub fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> Result<Vec<T>> {
    let available = items.len();
    if offset > available {
        return Err(Error::OutOfRange { offset, available });
    }
    let iter = items.into_iter().skip(offset);
    Ok(if limit == 0 {
        iter.collect()
    } else {
        iter.take(limit).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matching() {
        let owners = vec![IssuerId::new("a"), IssuerId::new("a"), IssuerId::new("b")];
        let filter = OwnerFilter::new(&owners);
        assert!(!filter.is_empty());
        assert_eq!(filter.owners().count(), 2);
        assert!(filter.matches(&IssuerId::new("a")));
        assert!(!filter.matches(&IssuerId::new("c")));

        let everyone = OwnerFilter::new(&[]);
        assert!(everyone.is_empty());
        assert!(everyone.matches(&IssuerId::new("c")));
    }

    #[test]
    fn test_paginate_bounds() {
        let items = vec![1, 2, 3];
        assert_eq!(paginate(items.clone(), 0, 0).unwrap(), vec![1, 2, 3]);
        assert_eq!(paginate(items.clone(), 1, 1).unwrap(), vec![2]);
        assert_eq!(paginate(items.clone(), 2, 10).unwrap(), vec![3]);
        assert!(paginate(items.clone(), 3, 0).unwrap().is_empty());
        assert_eq!(
            paginate(items, 4, 0),
            Err(Error::OutOfRange {
                offset: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_paginate_empty_list() {
        let empty: Vec<u8> = Vec::new();
        assert!(paginate(empty.clone(), 0, 5).unwrap().is_empty());
        assert!(paginate(empty, 1, 0).is_err());
    }
}
