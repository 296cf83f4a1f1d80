//! Version history ledger.
//!
//! Before each qualifying AI turn the entire file set is snapshotted, keyed
//! by (project id, user-message id), so the user can later revert all files
//! to how they looked right before any past request. Snapshots are immutable
//! once written; they are only ever replaced wholesale or deleted by key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{ProjectFile, ProjectHistory, VersionSnapshot};

/// Per-project version snapshots, keyed by project id then user-message id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionLedger {
    projects: BTreeMap<String, ProjectHistory>,
}

impl VersionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a loaded ledger map.
    #[must_use]
    pub fn from_map(projects: BTreeMap<String, ProjectHistory>) -> Self {
        Self { projects }
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, ProjectHistory> {
        &self.projects
    }

    /// Snapshots for one project, newest first.
    #[must_use]
    pub fn versions_for(&self, project_id: &str) -> Vec<(&String, &VersionSnapshot)> {
        let mut versions: Vec<_> = self
            .projects
            .get(project_id)
            .map(|h| h.iter().collect())
            .unwrap_or_default();
        versions.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
        versions
    }

    /// Record a snapshot of `files` keyed by the triggering user message.
    ///
    /// Stores a deep copy; the live collection is untouched.
    pub fn record(
        &mut self,
        project_id: &str,
        message_id: &str,
        message_text: &str,
        files: &[ProjectFile],
        now: i64,
    ) {
        self.projects.entry(project_id.to_string()).or_default().insert(
            message_id.to_string(),
            VersionSnapshot {
                timestamp: now,
                files: files.to_vec(),
                message_text: message_text.to_string(),
            },
        );
    }

    /// Fetch one snapshot's files as a deep copy for restore.
    ///
    /// The snapshot itself stays in the ledger.
    ///
    /// # Errors
    ///
    /// `SnapshotNotFound` if no entry exists for the message id.
    pub fn restore(&self, project_id: &str, message_id: &str) -> Result<Vec<ProjectFile>> {
        self.projects
            .get(project_id)
            .and_then(|h| h.get(message_id))
            .map(|v| v.files.clone())
            .ok_or_else(|| Error::SnapshotNotFound { message_id: message_id.to_string() })
    }

    /// Delete one snapshot by message id, leaving others untouched.
    ///
    /// # Errors
    ///
    /// `SnapshotNotFound` if no entry exists for the message id.
    pub fn delete(&mut self, project_id: &str, message_id: &str) -> Result<()> {
        let removed = self
            .projects
            .get_mut(project_id)
            .and_then(|h| h.remove(message_id));
        if removed.is_none() {
            return Err(Error::SnapshotNotFound { message_id: message_id.to_string() });
        }
        Ok(())
    }

    /// Remove every snapshot for one project.
    pub fn clear_project(&mut self, project_id: &str) {
        self.projects.remove(project_id);
    }

    /// Drop history for projects that no longer exist.
    pub fn retain_projects<F>(&mut self, mut exists: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.projects.retain(|id, _| exists(id));
    }

    /// Take the history belonging to one project (for persisting onto the
    /// project record).
    #[must_use]
    pub fn history_for(&self, project_id: &str) -> ProjectHistory {
        self.projects.get(project_id).cloned().unwrap_or_default()
    }

    /// Install a project's saved history (on project load).
    pub fn set_history_for(&mut self, project_id: &str, history: ProjectHistory) {
        self.projects.insert(project_id.to_string(), history);
    }

    /// Number of snapshots for a project.
    #[must_use]
    pub fn count_for(&self, project_id: &str) -> usize {
        self.projects.get(project_id).map_or(0, BTreeMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::initial_files;

    #[test]
    fn test_record_and_restore_round_trip() {
        let mut ledger = VersionLedger::new();
        let files = initial_files(1);
        ledger.record("proj_a", "msg_1", "make it blue", &files, 10);

        let restored = ledger.restore("proj_a", "msg_1").unwrap();
        assert_eq!(restored.len(), files.len());
        assert_eq!(restored[0].content, files[0].content);

        // Restoring does not consume the snapshot.
        assert_eq!(ledger.count_for("proj_a"), 1);
    }

    #[test]
    fn test_snapshot_is_deep_copy() {
        let mut ledger = VersionLedger::new();
        let mut files = initial_files(1);
        ledger.record("proj_a", "msg_1", "x", &files, 10);

        // Mutate the live set after the snapshot.
        files[0].content = "mutated".to_string();

        let restored = ledger.restore("proj_a", "msg_1").unwrap();
        assert_ne!(restored[0].content, "mutated");
    }

    #[test]
    fn test_delete_one_leaves_others() {
        let mut ledger = VersionLedger::new();
        let files = initial_files(1);
        ledger.record("proj_a", "msg_1", "a", &files, 10);
        ledger.record("proj_a", "msg_2", "b", &files, 20);

        ledger.delete("proj_a", "msg_1").unwrap();
        assert!(ledger.restore("proj_a", "msg_1").is_err());
        assert!(ledger.restore("proj_a", "msg_2").is_ok());
    }

    #[test]
    fn test_clear_is_scoped_to_project() {
        let mut ledger = VersionLedger::new();
        let files = initial_files(1);
        ledger.record("proj_a", "msg_1", "a", &files, 10);
        ledger.record("proj_b", "msg_2", "b", &files, 20);

        ledger.clear_project("proj_a");
        assert_eq!(ledger.count_for("proj_a"), 0);
        assert_eq!(ledger.count_for("proj_b"), 1);
    }

    #[test]
    fn test_retain_projects_drops_orphans() {
        let mut ledger = VersionLedger::new();
        let files = initial_files(1);
        ledger.record("proj_a", "msg_1", "a", &files, 10);
        ledger.record("proj_gone", "msg_2", "b", &files, 20);

        ledger.retain_projects(|id| id == "proj_a");
        assert_eq!(ledger.count_for("proj_a"), 1);
        assert_eq!(ledger.count_for("proj_gone"), 0);
    }

    #[test]
    fn test_versions_sorted_newest_first() {
        let mut ledger = VersionLedger::new();
        let files = initial_files(1);
        ledger.record("proj_a", "msg_1", "a", &files, 10);
        ledger.record("proj_a", "msg_2", "b", &files, 30);
        ledger.record("proj_a", "msg_3", "c", &files, 20);

        let versions = ledger.versions_for("proj_a");
        let order: Vec<i64> = versions.iter().map(|(_, v)| v.timestamp).collect();
        assert_eq!(order, vec![30, 20, 10]);
    }
}
