//! Registry configuration
//!
//! Settings are plain serde data so hosts can keep them in a RON file next
//! to their issuer catalogs:
//!
//! ```
//! use laurel_core::{RegistryConfig, StorageConfig};
//!
//! let config = RegistryConfig::from_ron_str(
//!     r#"(notify_capacity: 16, storage: File("achievements.db"))"#,
//! )
//! .unwrap();
//! assert_eq!(config.notify_capacity(), 16);
//! assert!(matches!(config.storage, StorageConfig::File(_)));
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default per-subscriber notification buffer
pub const DEFAULT_NOTIFY_CAPACITY: usize = 256;

/// Where registry state lives
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageConfig {
    /// Process memory only; state is lost on exit
    #[default]
    InMemory,
    /// Database file at the given path
    File(PathBuf),
}

/// Configuration for a registry instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Events each notification subscriber may buffer
    ///
    /// Clamped to at least 1 when read.
    notify_capacity: usize,
    /// Storage backend selection
    pub storage: StorageConfig,
}

impl RegistryConfig {
    /// Parse a configuration from RON text
    pub fn from_ron_str(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_ron_str(&content)
    }

    /// Use a specific subscriber buffer size
    pub fn with_notify_capacity(mut self, capacity: usize) -> Self {
        self.notify_capacity = capacity.max(1);
        self
    }

    /// Use a specific storage backend
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    /// Events each notification subscriber may buffer
    pub fn notify_capacity(&self) -> usize {
        self.notify_capacity.max(1)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            notify_capacity: DEFAULT_NOTIFY_CAPACITY,
            storage: StorageConfig::InMemory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = RegistryConfig::default();
        assert_eq!(config.notify_capacity(), DEFAULT_NOTIFY_CAPACITY);
        assert_eq!(config.storage, StorageConfig::InMemory);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = RegistryConfig::from_ron_str("(notify_capacity: 8)").unwrap();
        assert_eq!(config.notify_capacity(), 8);
        assert_eq!(config.storage, StorageConfig::InMemory);
    }

    #[test]
    fn test_capacity_clamped() {
        let config = RegistryConfig::from_ron_str("(notify_capacity: 0)").unwrap();
        assert_eq!(config.notify_capacity(), 1);
        assert_eq!(
            RegistryConfig::default()
                .with_notify_capacity(0)
                .notify_capacity(),
            1
        );
    }

    #[test]
    fn test_bad_ron() {
        let err = RegistryConfig::from_ron_str("(notify_capacity: \"many\")").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RegistryConfig::load("/nonexistent/laurel.ron").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
