//! Laurel DB - Database layer using native_db
//!
//! Provides persistent storage for:
//! - Achievement definitions and the id allocators
//! - Award records in award order
//! - Per-summoner totals and per-issuer subtotals
//!
//! [`Store`] implements [`laurel_core::AchievementLedger`] with the same
//! behaviour as the in-memory registry, and can rebuild one with
//! [`Store::load_registry`].

mod error;
mod models;
mod queries;
mod store;

pub use error::{Error, Result};
pub use models::{StoredAward, StoredCounter, StoredMetadata, StoredSubtotal, StoredTotal};
pub use store::Store;
