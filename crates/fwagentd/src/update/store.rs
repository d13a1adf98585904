//! Persisted record of installed versions.
//!
//! JSON document `{"files": [{"destination", "file_version"}]}` keyed by
//! destination (at most one record per destination). Loaded at the start of
//! a run, written back once after all entries are processed.

use fwagent_common::{Result, UpdateError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledRecord {
    pub destination: PathBuf,
    pub file_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionStore {
    pub files: Vec<InstalledRecord>,
}

impl VersionStore {
    /// Load from `path`. A missing file bootstraps an empty store and
    /// persists it before returning, so the first run starts from
    /// `{"files": []}` on disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let store = Self::default();
            store.save(path)?;
            debug!(path = %path.display(), "Initialized empty version store");
            return Ok(store);
        }
        let raw = fs::read_to_string(path).map_err(|e| UpdateError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| UpdateError::StoreCorrupt(e.to_string()))
    }

    /// Serialize and replace the store file through a temp file in the same
    /// directory, renamed over the target.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| UpdateError::io(parent, e))?;

        let data = serde_json::to_vec_pretty(self)?;
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| UpdateError::io(parent, e))?;
        tmp.write_all(&data).map_err(|e| UpdateError::io(path, e))?;
        tmp.flush().map_err(|e| UpdateError::io(path, e))?;
        tmp.persist(path).map_err(|e| UpdateError::io(path, e.error))?;
        Ok(())
    }

    /// Version currently recorded for a destination, if any.
    pub fn version_of(&self, destination: &Path) -> Option<&str> {
        self.files
            .iter()
            .find(|r| r.destination == destination)
            .map(|r| r.file_version.as_str())
    }

    /// Insert or update the record for `destination`, preserving the
    /// unique-destination invariant.
    pub fn upsert(&mut self, destination: &Path, version: &str) {
        match self
            .files
            .iter_mut()
            .find(|r| r.destination == destination)
        {
            Some(record) => record.file_version = version.to_string(),
            None => self.files.push(InstalledRecord {
                destination: destination.to_path_buf(),
                file_version: version.to_string(),
            }),
        }
    }
}
