//! Laurel Core - Achievement registry bookkeeping
//!
//! This crate provides the types and the in-memory engine of the registry:
//! - Identity types (`IssuerId`, `SummonerId`, `MetadataId`)
//! - Achievement definitions with explicit validation
//! - One-time awards with ownership checks and duplicate detection
//! - Point aggregation and filtered, paginated listings
//! - Award notifications for external observers
//!
//! ## Backends
//!
//! Every backend implements [`AchievementLedger`]. [`Registry`] keeps all
//! state in memory behind a single lock; `laurel-db` provides a persistent
//! store with the same behaviour.
//!
//! ## Consistency
//!
//! Derived views (per-summoner lists and point totals) are maintained
//! incrementally. [`Registry::audit`] recomputes them from the owned tables
//! and reports any divergence; [`RegistrySnapshot`] carries only the owned
//! tables and rebuilds the views on restore.

mod audit;
mod award;
pub mod clock;
mod config;
mod error;
mod identity;
mod ledger;
mod metadata;
mod notify;
mod registry;
mod snapshot;

pub use audit::{AuditReport, Discrepancy};
pub use award::{paginate, AwardEntry, AwardRecord, OwnerFilter};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RegistryConfig, StorageConfig, DEFAULT_NOTIFY_CAPACITY};
pub use error::{Error, Result, ValidationError};
pub use identity::{IssuerId, MetadataId, SummonerId};
pub use ledger::AchievementLedger;
pub use metadata::{AchievementDefinition, AchievementMetadata, Difficulty};
pub use notify::{AwardEvent, Notifier};
pub use registry::Registry;
pub use snapshot::RegistrySnapshot;

// Subscribers receive events through this channel type
pub use crossbeam_channel::Receiver;
