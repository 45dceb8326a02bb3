//! RON catalog loader

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Loader for issuer catalog files
#[derive(Debug, Default)]
pub struct Loader {
    catalogs: Vec<Catalog>,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a RON string
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        let catalog = Catalog::from_ron_str(content)?;
        catalog.validate()?;
        tracing::debug!(
            source = %catalog.source_name,
            count = catalog.achievements.len(),
            "loaded catalog"
        );
        self.catalogs.push(catalog);
        Ok(())
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())?;
        self.load_str(&content)
    }

    /// Load all RON files from a directory, recursing into subdirectories
    ///
    /// Files are visited in name order so registration order, and therefore
    /// the assigned ids, do not depend on the filesystem.
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for file_path in entries {
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Get the catalogs loaded so far
    pub fn catalogs(&self) -> &[Catalog] {
        &self.catalogs
    }

    /// Finish loading and return the catalogs in load order
    pub fn finish(self) -> Vec<Catalog> {
        self.catalogs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOREST: &str = r#"
    (
        source_name: "Whispering Forest",
        achievements: [
            (key: "lost", title: "Got lost", description: "Wander off the path", points: 1),
        ],
    )
    "#;

    #[test]
    fn test_load_str_defaults_difficulty() {
        let mut loader = Loader::new();
        loader.load_str(FOREST).unwrap();

        let catalogs = loader.finish();
        assert_eq!(catalogs.len(), 1);
        assert_eq!(catalogs[0].source_name, "Whispering Forest");
        assert_eq!(catalogs[0].achievements[0].difficulty, 0);
    }

    #[test]
    fn test_load_str_rejects_zero_points() {
        let content = r#"
        (
            source_name: "Broken",
            achievements: [(key: "free", title: "t", description: "d", points: 0)],
        )
        "#;
        let mut loader = Loader::new();
        assert!(matches!(
            loader.load_str(content),
            Err(Error::InvalidDefinition { .. })
        ));
        assert!(loader.catalogs().is_empty());
    }

    #[test]
    fn test_load_str_parse_error() {
        let mut loader = Loader::new();
        assert!(matches!(loader.load_str("(source_name: 3)"), Err(Error::Ron(_))));
    }

    #[test]
    fn test_load_directory_missing() {
        let mut loader = Loader::new();
        assert!(matches!(
            loader.load_directory("/nonexistent/catalogs"),
            Err(Error::Io(_))
        ));
    }

    fn catalog(source: &str, key: &str) -> String {
        format!(
            r#"(source_name: "{}", achievements: [(key: "{}", title: "t", description: "d", points: 3)])"#,
            source, key
        )
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forest.ron");
        fs::write(&path, FOREST).unwrap();

        let mut loader = Loader::new();
        loader.load_file(&path).unwrap();
        assert_eq!(loader.catalogs()[0].source_name, "Whispering Forest");

        assert!(matches!(
            loader.load_file(dir.path().join("missing.ron")),
            Err(Error::Io(_))
        ));
        assert_eq!(loader.catalogs().len(), 1);
    }

    #[test]
    fn test_load_directory_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();

        // Written out of name order
        fs::write(nested.join("c_tower.ron"), catalog("Tower", "top")).unwrap();
        fs::write(dir.path().join("b_cave.ron"), catalog("Cave", "bat")).unwrap();
        fs::write(dir.path().join("a_forest.ron"), catalog("Forest", "lost")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a catalog").unwrap();

        let mut loader = Loader::new();
        loader.load_directory(dir.path()).unwrap();

        let sources: Vec<_> = loader
            .finish()
            .into_iter()
            .map(|c| c.source_name)
            .collect();
        assert_eq!(sources, vec!["Forest", "Cave", "Tower"]);
    }
}
