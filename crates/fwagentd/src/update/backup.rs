//! Backup snapshots and restore.
//!
//! A snapshot is a plain copy of the destination's pre-overwrite content
//! under the backup root, named by the destination's base name. A newer
//! snapshot of the same base name overwrites the older one; there is no
//! history. The engine never prunes snapshots.

use fwagent_common::{Result, UpdateError};
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

/// Snapshot `source` (file or full directory tree) under `backup_root`.
///
/// A missing or unreadable source is `BackupFailed`; callers decide
/// beforehand whether a backup is needed at all (nothing installed yet
/// means nothing to snapshot).
pub fn backup(source: &Path, backup_root: &Path) -> Result<()> {
    let target = backup_root.join(base_name(source).map_err(|e| backup_failed(source, e))?);
    let meta = fs::metadata(source).map_err(|e| backup_failed(source, e))?;

    let result = if meta.is_dir() {
        copy_dir(source, &target)
    } else {
        copy_file(source, &target)
    };
    result.map_err(|e| backup_failed(source, e))?;

    info!(
        source = %source.display(),
        snapshot = %target.display(),
        "Backup created"
    );
    Ok(())
}

/// Mirror image of [`backup`]: copy the snapshot for `destination` back
/// onto the live path.
pub fn restore(backup_root: &Path, destination: &Path) -> Result<()> {
    let snapshot =
        backup_root.join(base_name(destination).map_err(|e| restore_failed(destination, e))?);
    let meta = fs::metadata(&snapshot).map_err(|e| restore_failed(destination, e))?;

    let result = if meta.is_dir() {
        copy_dir(&snapshot, destination)
    } else {
        copy_file(&snapshot, destination)
    };
    result.map_err(|e| restore_failed(destination, e))?;

    info!(
        snapshot = %snapshot.display(),
        destination = %destination.display(),
        "Backup restored"
    );
    Ok(())
}

fn base_name(path: &Path) -> io::Result<&std::ffi::OsStr> {
    path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "path has no base name to snapshot under",
        )
    })
}

fn copy_file(source: &Path, destination: &Path) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, destination)?;
    Ok(())
}

fn copy_dir(source: &Path, destination: &Path) -> io::Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = destination.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn backup_failed(path: &Path, source: io::Error) -> UpdateError {
    UpdateError::BackupFailed {
        path: path.to_path_buf(),
        source,
    }
}

fn restore_failed(destination: &Path, source: io::Error) -> UpdateError {
    UpdateError::RestoreFailed {
        destination: destination.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_backup_copies_bytes() {
        let live = tempdir().unwrap();
        let root = tempdir().unwrap();
        let file = live.path().join("config.bin");
        fs::write(&file, b"settings").unwrap();

        backup(&file, root.path()).unwrap();

        assert_eq!(fs::read(root.path().join("config.bin")).unwrap(), b"settings");
    }

    #[test]
    fn dir_backup_mirrors_the_whole_tree() {
        let live = tempdir().unwrap();
        let root = tempdir().unwrap();
        let dir = live.path().join("assets");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("top.txt"), b"top").unwrap();
        fs::write(dir.join("nested").join("deep.txt"), b"deep").unwrap();

        backup(&dir, root.path()).unwrap();

        let snapshot = root.path().join("assets");
        assert_eq!(fs::read(snapshot.join("top.txt")).unwrap(), b"top");
        assert_eq!(
            fs::read(snapshot.join("nested").join("deep.txt")).unwrap(),
            b"deep"
        );
    }

    #[test]
    fn missing_source_is_backup_failed() {
        let live = tempdir().unwrap();
        let root = tempdir().unwrap();
        let err = backup(&live.path().join("absent"), root.path()).unwrap_err();
        assert!(matches!(err, UpdateError::BackupFailed { .. }));
    }

    #[test]
    fn restore_round_trips_a_file() {
        let live = tempdir().unwrap();
        let root = tempdir().unwrap();
        let file = live.path().join("config.bin");
        fs::write(&file, b"before").unwrap();

        backup(&file, root.path()).unwrap();
        fs::write(&file, b"after").unwrap();
        restore(root.path(), &file).unwrap();

        assert_eq!(fs::read(&file).unwrap(), b"before");
    }

    #[test]
    fn restore_without_snapshot_names_the_destination() {
        let live = tempdir().unwrap();
        let root = tempdir().unwrap();
        let destination = live.path().join("config.bin");
        match restore(root.path(), &destination) {
            Err(UpdateError::RestoreFailed { destination: d, .. }) => {
                assert_eq!(d, destination);
            }
            other => panic!("expected RestoreFailed, got {other:?}"),
        }
    }

    #[test]
    fn newer_snapshot_overwrites_older_one() {
        let live = tempdir().unwrap();
        let root = tempdir().unwrap();
        let file = live.path().join("config.bin");

        fs::write(&file, b"v1").unwrap();
        backup(&file, root.path()).unwrap();
        fs::write(&file, b"v2").unwrap();
        backup(&file, root.path()).unwrap();

        assert_eq!(fs::read(root.path().join("config.bin")).unwrap(), b"v2");
    }
}
