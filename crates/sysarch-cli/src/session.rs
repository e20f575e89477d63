//! The loaded model a command runs against.

use crate::error::{CliError, Result};
use crate::resolve;
use std::path::{Path, PathBuf};
use sysarch_domain::{ModelRead, Project, ScoringConfig};
use sysarch_store::MemoryStore;
use tracing::debug;

/// A model snapshot loaded from disk, plus the selections that scope
/// commands to one project.
pub struct Session {
    store: MemoryStore,
    data_file: PathBuf,
    project: Option<String>,
    scoring: ScoringConfig,
    dirty: bool,
}

impl Session {
    /// Load the snapshot at `data_file` (empty if it does not exist yet).
    pub fn open(
        data_file: impl Into<PathBuf>,
        project: Option<String>,
        scoring: ScoringConfig,
    ) -> Result<Self> {
        let data_file = data_file.into();
        let store = MemoryStore::open(&data_file)?;
        Ok(Self::with_store(store, data_file, project, scoring))
    }

    /// Wrap an already loaded store.
    pub fn with_store(
        store: MemoryStore,
        data_file: PathBuf,
        project: Option<String>,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            store,
            data_file,
            project,
            scoring,
            dirty: false,
        }
    }

    /// Read access to the model.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Write access to the model; marks the session for saving.
    pub fn store_mut(&mut self) -> &mut MemoryStore {
        self.dirty = true;
        &mut self.store
    }

    /// Snapshot file backing this session.
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Scoring rules from the configuration.
    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Whether a mutating command ran.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the snapshot back if anything changed.
    pub fn save(&mut self) -> Result<()> {
        if self.dirty {
            self.store.save(&self.data_file)?;
            self.dirty = false;
        } else {
            debug!(path = %self.data_file.display(), "No changes to save");
        }
        Ok(())
    }

    /// The project commands operate on.
    ///
    /// An explicit `key` wins, then the selected project; with neither, a
    /// model holding exactly one project uses that one.
    pub fn project(&self, key: Option<&str>) -> Result<Project> {
        if let Some(key) = key.or(self.project.as_deref()) {
            return resolve::project(&self.store, key);
        }
        let mut projects = self.store.projects();
        if projects.len() == 1 {
            return Ok(projects.remove(0));
        }
        Err(CliError::NoProject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysarch_domain::{ModelStore, NamedAttrs};

    #[test]
    fn test_single_project_is_implicit() {
        let mut store = MemoryStore::new();
        let toast = store.create_project(NamedAttrs::named("Toast")).unwrap();
        let session = Session::with_store(store, PathBuf::from("unused.json"), None, ScoringConfig::default());
        assert_eq!(session.project(None).unwrap().id, toast.id);
    }

    #[test]
    fn test_ambiguous_project_requires_selection() {
        let mut store = MemoryStore::new();
        store.create_project(NamedAttrs::named("Toast")).unwrap();
        store.create_project(NamedAttrs::named("Naval")).unwrap();
        let session = Session::with_store(store, PathBuf::from("unused.json"), None, ScoringConfig::default());
        assert!(matches!(session.project(None), Err(CliError::NoProject)));
        assert_eq!(session.project(Some("Naval")).unwrap().name, "Naval");
    }

    #[test]
    fn test_save_only_when_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut session = Session::open(&path, None, ScoringConfig::default()).unwrap();

        session.save().unwrap();
        assert!(!path.exists());

        session
            .store_mut()
            .create_project(NamedAttrs::named("Toast"))
            .unwrap();
        session.save().unwrap();
        assert!(path.exists());
        assert!(!session.is_dirty());
    }
}
