//! Update and rollback orchestration.
//!
//! Entries are processed in manifest order, synchronously. The first fatal
//! error aborts the run: earlier entries stay applied on disk, later ones
//! are never attempted, and the version store file is only rewritten after
//! a fully successful pass. A retry of the same archive re-applies the
//! already-updated destinations, re-snapshotting them first.

use crate::update::backup;
use crate::update::manifest::{self, ManifestEntry};
use crate::update::store::VersionStore;
use fwagent_common::types::{EntryOutcome, EntryReport, UpdateReport};
use fwagent_common::{hashing, version, Result, UpdateError};
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};
use zip::result::ZipError;
use zip::ZipArchive;

pub struct UpdateEngine {
    store_path: PathBuf,
    backup_root: PathBuf,
}

impl UpdateEngine {
    pub fn new(store_path: impl Into<PathBuf>, backup_root: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            backup_root: backup_root.into(),
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Apply a manifested archive to the live filesystem.
    ///
    /// The archive handle is scoped to this call: opened before the
    /// manifest is read, closed when the run ends either way.
    pub fn update(&self, archive_path: &Path) -> Result<UpdateReport> {
        info!(archive = %archive_path.display(), "Starting firmware update");

        let file = File::open(archive_path).map_err(|e| UpdateError::io(archive_path, e))?;
        let mut archive = ZipArchive::new(file)?;
        let manifest = manifest::read_manifest(&mut archive)?;
        let mut store = VersionStore::load(&self.store_path)?;

        let mut entries = Vec::with_capacity(manifest.len());
        for entry in &manifest {
            let outcome = self.process_entry(&mut archive, entry, &mut store)?;
            entries.push(EntryReport {
                destination: entry.destination.clone(),
                file_version: entry.file_version.clone(),
                outcome,
            });
        }

        store.save(&self.store_path)?;

        let report = UpdateReport::new(entries);
        info!(
            applied = report.applied,
            skipped = report.skipped,
            "Firmware update completed"
        );
        Ok(report)
    }

    /// Restore every tracked destination from its backup snapshot.
    ///
    /// The store is read-only here: recorded versions are not rewound.
    /// Callers wanting the store to match the restored bytes must
    /// reconcile it themselves.
    pub fn rollback(&self, store: &VersionStore) -> Result<()> {
        info!(entries = store.files.len(), "Starting firmware rollback");
        for record in &store.files {
            backup::restore(&self.backup_root, &record.destination)?;
        }
        info!("Firmware rollback completed");
        Ok(())
    }

    fn process_entry(
        &self,
        archive: &mut ZipArchive<File>,
        entry: &ManifestEntry,
        store: &mut VersionStore,
    ) -> Result<EntryOutcome> {
        if let Some(installed) = store.version_of(&entry.destination) {
            if !version::is_newer_or_equal(&entry.file_version, installed)? {
                info!(
                    destination = %entry.destination.display(),
                    installed,
                    offered = %entry.file_version,
                    "Skipping entry: installed version is newer"
                );
                return Ok(EntryOutcome::Skipped);
            }

            // Drift gate: refuse to overwrite a destination whose current
            // content no longer matches the manifest's expected fingerprint.
            let actual = if entry.is_dir {
                hashing::hash_dir(&entry.destination)?
            } else {
                hashing::hash_file(&entry.destination)?
            };
            if actual != entry.hash {
                return Err(UpdateError::HashMismatch {
                    destination: entry.destination.clone(),
                    expected: entry.hash.clone(),
                    actual,
                });
            }
        }

        // Nothing installed yet means nothing to snapshot.
        if entry.destination.exists() {
            backup::backup(&entry.destination, &self.backup_root)?;
        }

        if entry.is_dir {
            extract_dir(archive, entry)?;
        } else {
            extract_file(archive, entry)?;
        }

        store.upsert(&entry.destination, &entry.file_version);
        info!(
            destination = %entry.destination.display(),
            version = %entry.file_version,
            "Entry applied"
        );
        Ok(EntryOutcome::Applied)
    }
}

fn extract_file(archive: &mut ZipArchive<File>, entry: &ManifestEntry) -> Result<()> {
    let mut src = match archive.by_name(&entry.source) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => {
            return Err(UpdateError::SourceMissing(entry.source.clone()))
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(parent) = entry.destination.parent() {
        fs::create_dir_all(parent).map_err(|e| UpdateError::io(parent, e))?;
    }
    let mut dest =
        File::create(&entry.destination).map_err(|e| UpdateError::io(&entry.destination, e))?;
    io::copy(&mut src, &mut dest).map_err(|e| UpdateError::io(&entry.destination, e))?;
    Ok(())
}

fn extract_dir(archive: &mut ZipArchive<File>, entry: &ManifestEntry) -> Result<()> {
    let prefix = if entry.source.ends_with('/') {
        entry.source.clone()
    } else {
        format!("{}/", entry.source)
    };

    let names: Vec<String> = archive
        .file_names()
        .filter(|name| *name == entry.source.as_str() || name.starts_with(&prefix))
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Err(UpdateError::SourceMissing(entry.source.clone()));
    }

    fs::create_dir_all(&entry.destination).map_err(|e| UpdateError::io(&entry.destination, e))?;

    for name in names {
        let rel = name
            .strip_prefix(prefix.trim_end_matches('/'))
            .unwrap_or("")
            .trim_start_matches('/');
        if rel.is_empty() {
            continue;
        }
        if Path::new(rel)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            warn!(entry = %name, "Refusing archive entry that escapes its destination");
            return Err(UpdateError::io(
                &entry.destination,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("archive entry '{name}' escapes destination"),
                ),
            ));
        }

        let target = entry.destination.join(rel);
        let mut src = archive.by_name(&name)?;
        if src.is_dir() {
            fs::create_dir_all(&target).map_err(|e| UpdateError::io(&target, e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| UpdateError::io(parent, e))?;
            }
            let mut dest = File::create(&target).map_err(|e| UpdateError::io(&target, e))?;
            io::copy(&mut src, &mut dest).map_err(|e| UpdateError::io(&target, e))?;
        }
    }
    Ok(())
}
