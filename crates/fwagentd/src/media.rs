//! Removable media discovery and firmware archive listing.
//!
//! Discovery shells out to `lsblk`; the engine never mounts anything
//! itself. Parsing is split from command execution so the format handling
//! is testable without block devices.

use crate::update::manifest;
use anyhow::{Context, Result};
use fwagent_common::types::{ArchiveEntrySummary, ArchiveInfo};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::warn;
use zip::ZipArchive;

/// Mount points of mounted partitions, per `lsblk -o MOUNTPOINT,TYPE`.
pub fn mount_points() -> Result<Vec<PathBuf>> {
    let output = Command::new("lsblk")
        .args(["-o", "MOUNTPOINT,TYPE"])
        .output()
        .context("failed to run lsblk")?;
    if !output.status.success() {
        anyhow::bail!("lsblk exited with {}", output.status);
    }
    Ok(parse_mount_points(&String::from_utf8_lossy(&output.stdout)))
}

/// Extract mount points from lsblk output. Only `part` rows with a mount
/// point count; unmounted partitions print an empty first column and
/// collapse to a single field, so they are ignored.
fn parse_mount_points(raw: &str) -> Vec<PathBuf> {
    raw.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let mountpoint = fields.next()?;
            let kind = fields.next();
            (kind == Some("part") && mountpoint.starts_with('/'))
                .then(|| PathBuf::from(mountpoint))
        })
        .collect()
}

/// List firmware archives found at the top level of the given roots.
///
/// Archives whose manifest cannot be read are skipped with a warning
/// rather than failing the whole listing.
pub fn list_archives(roots: &[PathBuf]) -> Vec<ArchiveInfo> {
    let mut found = Vec::new();
    for root in roots {
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Cannot read media root");
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file || path.extension().and_then(|e| e.to_str()) != Some("zip") {
                continue;
            }
            match summarize_archive(&path) {
                Ok(info) => found.push(info),
                Err(e) => {
                    warn!(archive = %path.display(), error = %e, "Skipping unreadable archive");
                }
            }
        }
    }
    found
}

fn summarize_archive(path: &Path) -> Result<ArchiveInfo> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    let manifest = manifest::read_manifest(&mut archive)?;
    Ok(ArchiveInfo {
        path: path.to_path_buf(),
        files: manifest
            .into_iter()
            .map(|entry| ArchiveEntrySummary {
                source: entry.source,
                file_version: entry.file_version,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::FileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const LSBLK_OUTPUT: &str = "\
MOUNTPOINT TYPE
           disk
/media/usb0 part
            part
/ part
[SWAP] swap
";

    #[test]
    fn parses_mounted_partitions_only() {
        let points = parse_mount_points(LSBLK_OUTPUT);
        assert_eq!(
            points,
            vec![PathBuf::from("/media/usb0"), PathBuf::from("/")]
        );
    }

    #[test]
    fn empty_output_yields_no_mount_points() {
        assert!(parse_mount_points("").is_empty());
    }

    fn write_archive(path: &Path, manifest: &[u8]) {
        let file = fs::File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file("firmware.json", options).unwrap();
        zip.write_all(manifest).unwrap();
        zip.start_file("a.bin", options).unwrap();
        zip.write_all(b"payload").unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn lists_archives_and_skips_broken_ones() {
        let root = tempdir().unwrap();
        write_archive(
            &root.path().join("good.zip"),
            br#"[{"source": "a.bin", "destination": "/opt/a.bin",
                 "file_version": "1.0.0", "is_dir": false, "hash": ""}]"#,
        );
        fs::write(root.path().join("broken.zip"), b"not a zip").unwrap();
        fs::write(root.path().join("notes.txt"), b"ignored").unwrap();

        let listing = list_archives(&[root.path().to_path_buf()]);
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].path, root.path().join("good.zip"));
        assert_eq!(listing[0].files.len(), 1);
        assert_eq!(listing[0].files[0].file_version, "1.0.0");
    }

    #[test]
    fn unreadable_root_is_skipped() {
        let root = tempdir().unwrap();
        let gone = root.path().join("never-mounted");
        assert!(list_archives(&[gone]).is_empty());
    }
}
