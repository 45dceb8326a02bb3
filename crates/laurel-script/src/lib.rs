//! Laurel Script - RON catalog loader
//!
//! Loads issuer achievement catalogs from RON files and registers them with
//! any [`laurel_core::AchievementLedger`]:
//! - `Catalog` - one issuer's keyed achievement definitions
//! - `Loader` - reads files and directories of catalogs
//! - `RegisteredCatalog` - key to id mapping used when awarding

mod catalog;
mod error;
mod loader;

pub use catalog::{AchievementDef, Catalog, RegisteredCatalog};
pub use error::{Error, Result};
pub use loader::Loader;
