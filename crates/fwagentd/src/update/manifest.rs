//! Manifest discovery and decoding.
//!
//! The manifest is the single `.json` entry inside an update archive: a JSON
//! array of replacement operations. Two or more `.json` entries make the
//! archive ambiguous and the whole update is refused.

use fwagent_common::{Result, UpdateError};
use serde::{Deserialize, Serialize};
use std::io::{Read, Seek};
use std::path::PathBuf;
use tracing::debug;
use zip::ZipArchive;

pub const MANIFEST_SUFFIX: &str = ".json";

/// One replacement operation declared by the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path of the payload within the archive.
    pub source: String,
    /// Absolute path on the live filesystem.
    pub destination: PathBuf,
    pub file_version: String,
    pub is_dir: bool,
    /// Expected fingerprint of the currently installed content (drift
    /// check), not of the incoming payload.
    pub hash: String,
}

pub type Manifest = Vec<ManifestEntry>;

/// Locate and decode the manifest inside an open archive. Read-only.
pub fn read_manifest<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Manifest> {
    let mut candidates: Vec<String> = archive
        .file_names()
        .filter(|name| name.ends_with(MANIFEST_SUFFIX))
        .map(str::to_string)
        .collect();
    candidates.sort();

    let name = match candidates.len() {
        0 => return Err(UpdateError::ManifestNotFound),
        1 => candidates.remove(0),
        _ => {
            let second = candidates.remove(1);
            return Err(UpdateError::ManifestAmbiguous {
                first: candidates.remove(0),
                second,
            });
        }
    };

    let mut raw = String::new();
    let mut file = archive.by_name(&name)?;
    file.read_to_string(&mut raw)
        .map_err(|e| UpdateError::io(&name, e))?;
    drop(file);

    let manifest: Manifest =
        serde_json::from_str(&raw).map_err(|e| UpdateError::ManifestMalformed(e.to_string()))?;
    debug!(manifest = %name, entries = manifest.len(), "Manifest decoded");
    Ok(manifest)
}
