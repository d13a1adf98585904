//! Request/response types for the fwagentd HTTP API.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Daemon liveness and identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// A firmware archive discovered on removable media, with the manifest
/// summary used by the operator UI to pick one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveInfo {
    pub path: PathBuf,
    pub files: Vec<ArchiveEntrySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveEntrySummary {
    pub source: String,
    pub file_version: String,
}

/// Trigger an update run. The archive path is an explicit parameter of the
/// request; the daemon keeps no selected-file state between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub archive_path: PathBuf,
}

/// Per-entry outcome of an update run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOutcome {
    Applied,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryReport {
    pub destination: PathBuf,
    pub file_version: String,
    pub outcome: EntryOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReport {
    pub entries: Vec<EntryReport>,
    pub applied: usize,
    pub skipped: usize,
}

impl UpdateReport {
    pub fn new(entries: Vec<EntryReport>) -> Self {
        let applied = entries
            .iter()
            .filter(|e| e.outcome == EntryOutcome::Applied)
            .count();
        let skipped = entries.len() - applied;
        Self {
            entries,
            applied,
            skipped,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackResponse {
    /// Destinations restored from their backup snapshots.
    pub restored: usize,
}

/// Confirmation payload for shutdown/reboot requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerRequest {
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_outcomes() {
        let report = UpdateReport::new(vec![
            EntryReport {
                destination: PathBuf::from("/opt/a"),
                file_version: "1.0.0".into(),
                outcome: EntryOutcome::Applied,
            },
            EntryReport {
                destination: PathBuf::from("/opt/b"),
                file_version: "1.0.0".into(),
                outcome: EntryOutcome::Skipped,
            },
        ]);
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn outcome_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EntryOutcome::Applied).unwrap(),
            "\"applied\""
        );
    }
}
