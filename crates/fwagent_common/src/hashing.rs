//! Content fingerprints for files and directory trees.
//!
//! Directory digests are shallow: only the immediate child files of the
//! directory contribute, nested subdirectories are excluded. The per-file
//! digests are sorted lexicographically before being combined, so the result
//! does not depend on filesystem enumeration order.

use crate::error::{Result, UpdateError};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Hex-encoded SHA-256 of a byte slice.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hex-encoded SHA-256 of a file's contents.
pub fn hash_file(path: &Path) -> Result<String> {
    let data = fs::read(path).map_err(|e| UpdateError::io(path, e))?;
    Ok(hash_bytes(&data))
}

/// Order-independent digest of a directory's immediate child files.
pub fn hash_dir(path: &Path) -> Result<String> {
    let mut digests = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| UpdateError::io(path, e.into()))?;
        if entry.file_type().is_file() {
            digests.push(hash_file(entry.path())?);
        }
    }
    digests.sort();
    Ok(hash_bytes(digests.concat().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn file_hash_matches_known_vector() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abc.txt");
        fs::write(&path, b"abc").unwrap();
        assert_eq!(
            hash_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = hash_file(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, UpdateError::Io { .. }));
    }

    #[test]
    fn dir_hash_ignores_enumeration_order() {
        let a = tempdir().unwrap();
        fs::write(a.path().join("one"), b"first").unwrap();
        fs::write(a.path().join("two"), b"second").unwrap();

        // Same files created in the opposite order.
        let b = tempdir().unwrap();
        fs::write(b.path().join("two"), b"second").unwrap();
        fs::write(b.path().join("one"), b"first").unwrap();

        assert_eq!(hash_dir(a.path()).unwrap(), hash_dir(b.path()).unwrap());
    }

    #[test]
    fn dir_hash_is_shallow() {
        let plain = tempdir().unwrap();
        fs::write(plain.path().join("top"), b"visible").unwrap();

        let nested = tempdir().unwrap();
        fs::write(nested.path().join("top"), b"visible").unwrap();
        fs::create_dir(nested.path().join("sub")).unwrap();
        fs::write(nested.path().join("sub").join("deep"), b"invisible").unwrap();

        assert_eq!(
            hash_dir(plain.path()).unwrap(),
            hash_dir(nested.path()).unwrap()
        );
    }

    #[test]
    fn dir_hash_depends_on_content() {
        let a = tempdir().unwrap();
        fs::write(a.path().join("one"), b"first").unwrap();
        let b = tempdir().unwrap();
        fs::write(b.path().join("one"), b"changed").unwrap();
        assert_ne!(hash_dir(a.path()).unwrap(), hash_dir(b.path()).unwrap());
    }
}
