//! Agent configuration.
//!
//! Config file: /etc/fwagent/config.toml. Missing file or unreadable
//! content falls back to defaults so a factory-fresh appliance boots
//! without provisioning.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/fwagent/config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Address the HTTP API binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Directory holding the version store and backup snapshots.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            data_dir: default_data_dir(),
        }
    }
}

impl AgentConfig {
    /// Load from `path`, falling back to defaults when the file is missing
    /// or does not parse.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "invalid config at {}: {} (using defaults)",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Path of the persisted version store.
    pub fn version_store_path(&self) -> PathBuf {
        self.data_dir.join("installed_versions.json")
    }

    /// Root directory for pre-overwrite backup snapshots.
    pub fn backup_root(&self) -> PathBuf {
        self.data_dir.join("update_backup")
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:4444".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/var/lib/fwagent")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = AgentConfig::load(&dir.path().join("absent.toml"));
        assert_eq!(config.listen_addr, "0.0.0.0:4444");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/fwagent"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "listen_addr = \"127.0.0.1:8080\"\n").unwrap();
        let config = AgentConfig::load(&path);
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/fwagent"));
    }

    #[test]
    fn derived_paths_live_under_data_dir() {
        let config = AgentConfig {
            listen_addr: default_listen_addr(),
            data_dir: PathBuf::from("/data/fw"),
        };
        assert_eq!(
            config.version_store_path(),
            PathBuf::from("/data/fw/installed_versions.json")
        );
        assert_eq!(config.backup_root(), PathBuf::from("/data/fw/update_backup"));
    }
}
