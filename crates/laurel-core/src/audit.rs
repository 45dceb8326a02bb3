//! Consistency audit of the derived indices
//!
//! Per-summoner lists, totals and per-issuer subtotals are maintained
//! incrementally on every award. The audit recomputes them from the award
//! and metadata tables and reports every place the two disagree.

use crate::registry::{Registry, RegistryState, SummonerIndex};
use crate::{IssuerId, MetadataId, SummonerId};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

/// A single disagreement between a derived index and the tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// An award points at metadata that does not exist
    UnknownMetadata {
        summoner: SummonerId,
        metadata: MetadataId,
    },
    /// The summoner's ordered list differs from award order
    ListMismatch { summoner: SummonerId },
    /// The summoner's running total is wrong
    TotalMismatch {
        summoner: SummonerId,
        expected: u64,
        actual: u64,
    },
    /// A per-issuer subtotal is wrong
    SubtotalMismatch {
        summoner: SummonerId,
        owner: IssuerId,
        expected: u64,
        actual: u64,
    },
    /// The membership set disagrees with the award table
    MembershipMismatch {
        summoner: SummonerId,
        metadata: MetadataId,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::UnknownMetadata { summoner, metadata } => {
                write!(f, "{} holds unknown {}", summoner, metadata)
            }
            Discrepancy::ListMismatch { summoner } => {
                write!(f, "{} award list out of order", summoner)
            }
            Discrepancy::TotalMismatch {
                summoner,
                expected,
                actual,
            } => write!(f, "{} total {} != {}", summoner, actual, expected),
            Discrepancy::SubtotalMismatch {
                summoner,
                owner,
                expected,
                actual,
            } => write!(
                f,
                "{} subtotal for {} {} != {}",
                summoner, owner, actual, expected
            ),
            Discrepancy::MembershipMismatch { summoner, metadata } => {
                write!(f, "{} membership of {} out of sync", summoner, metadata)
            }
        }
    }
}

/// Result of an audit pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub summoners_checked: usize,
    pub awards_checked: usize,
    pub discrepancies: Vec<Discrepancy>,
}

impl AuditReport {
    /// Check whether the indices match the tables exactly
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Registry Audit ===")?;
        writeln!(f, "Summoners: {}", self.summoners_checked)?;
        writeln!(f, "Awards: {}", self.awards_checked)?;
        if self.is_consistent() {
            writeln!(f, "Consistent")
        } else {
            for discrepancy in &self.discrepancies {
                writeln!(f, "- {}", discrepancy)?;
            }
            Ok(())
        }
    }
}

impl RegistryState {
    /// Recompute the summoner indices from the award table alone
    fn recompute(&self, report: &mut AuditReport) -> IndexMap<SummonerId, SummonerIndex> {
        let mut rebuilt: IndexMap<SummonerId, SummonerIndex> = IndexMap::new();
        for (position, record) in self.awards.iter().enumerate() {
            let index = rebuilt.entry(record.summoner_id).or_default();
            index.awards.push(position);

            let Some(meta) = self.metadata(record.metadata_id) else {
                report.discrepancies.push(Discrepancy::UnknownMetadata {
                    summoner: record.summoner_id,
                    metadata: record.metadata_id,
                });
                continue;
            };
            index.total = index.total.saturating_add(meta.points);
            let subtotal = index.by_owner.entry(meta.owner.clone()).or_insert(0);
            *subtotal = subtotal.saturating_add(meta.points);
        }
        rebuilt
    }

    pub(crate) fn audit(&self) -> AuditReport {
        let mut report = AuditReport {
            awards_checked: self.awards.len(),
            ..AuditReport::default()
        };
        let rebuilt = self.recompute(&mut report);

        let summoners: HashSet<_> = rebuilt.keys().chain(self.summoners.keys()).collect();
        report.summoners_checked = summoners.len();
        let empty = SummonerIndex::default();

        for summoner in summoners {
            let expected = rebuilt.get(summoner).unwrap_or(&empty);
            let actual = self.summoners.get(summoner).unwrap_or(&empty);

            if expected.awards != actual.awards {
                report.discrepancies.push(Discrepancy::ListMismatch {
                    summoner: *summoner,
                });
            }
            if expected.total != actual.total {
                report.discrepancies.push(Discrepancy::TotalMismatch {
                    summoner: *summoner,
                    expected: expected.total,
                    actual: actual.total,
                });
            }

            let owners: HashSet<_> = expected
                .by_owner
                .keys()
                .chain(actual.by_owner.keys())
                .collect();
            for owner in owners {
                let want = expected.by_owner.get(owner).copied().unwrap_or(0);
                let have = actual.by_owner.get(owner).copied().unwrap_or(0);
                if want != have {
                    report.discrepancies.push(Discrepancy::SubtotalMismatch {
                        summoner: *summoner,
                        owner: owner.clone(),
                        expected: want,
                        actual: have,
                    });
                }
            }
        }

        let recorded: HashSet<_> = self
            .awards
            .iter()
            .map(|r| (r.summoner_id, r.metadata_id))
            .collect();
        for (summoner, metadata) in recorded.symmetric_difference(&self.awarded) {
            report.discrepancies.push(Discrepancy::MembershipMismatch {
                summoner: *summoner,
                metadata: *metadata,
            });
        }

        report
    }
}

impl Registry {
    /// Compare every derived index against a from-scratch recomputation
    pub fn audit(&self) -> AuditReport {
        let report = self.state.read().audit();
        if !report.is_consistent() {
            tracing::warn!(
                discrepancies = report.discrepancies.len(),
                "registry audit found inconsistencies"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AchievementDefinition, AchievementLedger, Difficulty};

    fn registry_with_awards() -> (Registry, IssuerId, MetadataId) {
        let registry = Registry::new();
        let a = IssuerId::new("a");
        let id = registry
            .register_achievement(
                &a,
                AchievementDefinition::new("A", Difficulty::Uncommon, "t", "d", 10),
            )
            .unwrap();
        registry.award_achievement(&a, SummonerId::new(1), id).unwrap();
        registry.award_achievement(&a, SummonerId::new(2), id).unwrap();
        (registry, a, id)
    }

    #[test]
    fn test_fresh_registry_consistent() {
        let report = Registry::new().audit();
        assert!(report.is_consistent());
        assert_eq!(report.summoners_checked, 0);
    }

    #[test]
    fn test_live_registry_consistent() {
        let (registry, _, _) = registry_with_awards();
        let report = registry.audit();
        assert!(report.is_consistent(), "{}", report);
        assert_eq!(report.summoners_checked, 2);
        assert_eq!(report.awards_checked, 2);
    }

    #[test]
    fn test_detects_tampered_total() {
        let (registry, a, _) = registry_with_awards();
        {
            let mut state = registry.state.write();
            let index = state.summoners.get_mut(&SummonerId::new(1)).unwrap();
            index.total = 99;
            index.by_owner.insert(a.clone(), 3);
        }

        let report = registry.audit();
        assert!(report.discrepancies.contains(&Discrepancy::TotalMismatch {
            summoner: SummonerId::new(1),
            expected: 10,
            actual: 99,
        }));
        assert!(report.discrepancies.contains(&Discrepancy::SubtotalMismatch {
            summoner: SummonerId::new(1),
            owner: a,
            expected: 10,
            actual: 3,
        }));
    }

    #[test]
    fn test_detects_membership_and_list_drift() {
        let (registry, _, id) = registry_with_awards();
        {
            let mut state = registry.state.write();
            state.awarded.remove(&(SummonerId::new(2), id));
            state.summoners.get_mut(&SummonerId::new(2)).unwrap().awards.clear();
        }

        let report = registry.audit();
        assert!(report.discrepancies.contains(&Discrepancy::MembershipMismatch {
            summoner: SummonerId::new(2),
            metadata: id,
        }));
        assert!(report.discrepancies.contains(&Discrepancy::ListMismatch {
            summoner: SummonerId::new(2),
        }));
        assert!(report.to_string().contains("summoner:2"));
    }
}
