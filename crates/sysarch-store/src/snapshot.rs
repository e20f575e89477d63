//! JSON snapshots of a [`MemoryStore`]

use crate::memory::{MemoryStore, Tables};
use crate::StoreError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

impl MemoryStore {
    /// Load a store from a snapshot file
    ///
    /// A missing file yields an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot yet; starting empty");
                return Ok(Self::new());
            }
            Err(err) => return Err(err.into()),
        };

        let tables: Tables = serde_json::from_str(&contents)?;
        let store = Self::from_tables(tables);
        debug!(
            path = %path.display(),
            relationships = store.relationship_count(),
            votes = store.vote_count(),
            "Loaded snapshot"
        );
        Ok(store)
    }

    /// Write the store to a snapshot file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(&self.tables)?;
        // stage beside the target, then swap in
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, contents)?;
        fs::rename(&staging, path)?;

        info!(path = %path.display(), "Saved snapshot");
        Ok(())
    }

    /// Serialize the store to a JSON string
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.tables)?)
    }

    /// Rebuild a store from a JSON string
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let tables: Tables = serde_json::from_str(json)?;
        Ok(Self::from_tables(tables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysarch_domain::{ModelRead, ModelStore, NamedAttrs, NodeAttrs};

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::open(dir.path().join("absent.json")).unwrap();
        assert!(store.projects().is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            MemoryStore::open(&path),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_json_round_trip_keeps_rows() {
        let mut store = MemoryStore::new();
        let project = store.create_project(NamedAttrs::named("Toast")).unwrap();
        store.add_function(project.id, NodeAttrs::named("Heat Bread")).unwrap();

        let json = store.to_json().unwrap();
        let restored = MemoryStore::from_json(&json).unwrap();
        assert_eq!(restored.projects(), store.projects());
        assert_eq!(restored.functions(project.id), store.functions(project.id));
    }
}
