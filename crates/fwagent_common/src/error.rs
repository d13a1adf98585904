//! Error taxonomy for the firmware update and rollback engine.
//!
//! Every failure is terminal for the operation that raised it; nothing is
//! retried internally. Variants carry the destination or source path being
//! processed so the caller can log a precise cause.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("no manifest document found in archive")]
    ManifestNotFound,

    #[error("ambiguous manifest: archive contains '{first}' and '{second}'")]
    ManifestAmbiguous { first: String, second: String },

    #[error("manifest is malformed: {0}")]
    ManifestMalformed(String),

    #[error("invalid version format '{0}' (expected major.minor.patch)")]
    InvalidVersionFormat(String),

    #[error("hash mismatch for {}: expected {expected}, got {actual}", destination.display())]
    HashMismatch {
        destination: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("backup of {} failed: {source}", path.display())]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("restore of {} failed: {source}", destination.display())]
    RestoreFailed {
        destination: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("version store is corrupt: {0}")]
    StoreCorrupt(String),

    #[error("source '{0}' not found in archive")]
    SourceMissing(String),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl UpdateError {
    /// Wrap an I/O failure with the path that was being processed.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, UpdateError>;
