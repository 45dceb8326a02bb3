//! Database models for persistent storage.

mod award;
mod metadata;

pub use award::*;
pub use metadata::*;
