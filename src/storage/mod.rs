//! Durable storage for Code Studio.
//!
//! Three named records live under the home directory:
//! - `projects.json` - the saved project list
//! - `workspace.json` - the active workspace snapshot
//! - `settings.json` - API credential and endpoint settings
//!
//! Writes go through a temp file and an atomic rename. Loads never fail the
//! caller: an unparseable record is logged and treated as absent, falling
//! back to an empty/default state for that record only.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{now_ms, ChatMessage, ProjectFile, ProjectHistory, SavedProject};
use crate::workspace::{FileSet, TabState, VersionLedger, Workspace};

/// Soft ceiling for the serialized workspace record; exceeding it only
/// warns.
pub const WORKSPACE_SOFT_LIMIT_BYTES: usize = 5 * 1024 * 1024;

/// Stale-workspace retention window for the quota-pressure prune.
pub const WORKSPACE_RETENTION_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Recommended debounce for persistence writes.
pub const PERSIST_DEBOUNCE_MS: u64 = 500;

const PROJECTS_FILE: &str = "projects.json";
const WORKSPACE_FILE: &str = "workspace.json";
const SETTINGS_FILE: &str = "settings.json";

/// The persisted workspace snapshot: current files, messages, project
/// binding, tab/active-file state, layout width, and the version ledger.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorkspaceRecord {
    pub files: Vec<ProjectFile>,
    pub messages: Vec<ChatMessage>,
    pub current_project_id: Option<String>,
    pub project_name: String,
    pub tabs: TabState,
    pub sidebar_width: u32,
    pub code_history: std::collections::BTreeMap<String, ProjectHistory>,
    pub last_active: i64,
}

impl WorkspaceRecord {
    /// Capture the live workspace state.
    #[must_use]
    pub fn capture(workspace: &Workspace, sidebar_width: u32) -> Self {
        Self {
            files: workspace.files().snapshot(),
            messages: workspace.messages().to_vec(),
            current_project_id: workspace.project_id().map(ToString::to_string),
            project_name: workspace.project_name().to_string(),
            tabs: workspace.tabs().clone(),
            sidebar_width,
            code_history: workspace.ledger().as_map().clone(),
            last_active: now_ms(),
        }
    }

    /// Rebuild a live workspace from this record.
    #[must_use]
    pub fn into_workspace(self) -> Workspace {
        Workspace::from_parts(
            FileSet::from_nodes(self.files),
            self.messages,
            self.tabs,
            VersionLedger::from_map(self.code_history),
            self.current_project_id,
            self.project_name,
        )
    }
}

/// Stored API settings; all optional, with env overrides applied by
/// [`crate::config`].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
}

/// Handle on the record directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open (and create if missing) the record directory.
    ///
    /// # Errors
    ///
    /// IO errors creating the directory.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ── Project list ──────────────────────────────────────────

    /// Load the saved project list; corrupt or missing yields empty.
    #[must_use]
    pub fn load_projects(&self) -> Vec<SavedProject> {
        self.load_record(PROJECTS_FILE).unwrap_or_default()
    }

    /// Persist the project list.
    ///
    /// # Errors
    ///
    /// IO/serialization errors; the previous file stays intact on failure.
    pub fn save_projects(&self, projects: &[SavedProject]) -> Result<()> {
        self.write_record(PROJECTS_FILE, projects)
    }

    // ── Workspace snapshot ────────────────────────────────────

    /// Load the workspace snapshot; corrupt or missing yields `None`.
    #[must_use]
    pub fn load_workspace(&self) -> Option<WorkspaceRecord> {
        self.load_record(WORKSPACE_FILE)
    }

    /// Persist the workspace snapshot.
    ///
    /// A payload over the soft ceiling logs a warning but is still written.
    /// A failed write triggers a best-effort prune of a stale on-disk
    /// workspace (older than the retention window) and is then dropped for
    /// this cycle; in-memory state is unaffected and the next debounced
    /// write tries again.
    pub fn save_workspace(&self, record: &WorkspaceRecord) {
        let payload = match serde_json::to_string(record) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("workspace record not serializable: {e}");
                return;
            }
        };

        if payload.len() > WORKSPACE_SOFT_LIMIT_BYTES {
            tracing::warn!(
                bytes = payload.len(),
                "workspace payload exceeds the soft size ceiling"
            );
        }

        if let Err(e) = atomic_write(&self.dir.join(WORKSPACE_FILE), &payload) {
            tracing::warn!("workspace write failed, dropping this cycle: {e}");
            self.prune_stale_workspace();
        }
    }

    /// Remove the on-disk workspace record if it has gone stale.
    fn prune_stale_workspace(&self) {
        let Some(existing) = self.load_workspace() else { return };
        if now_ms() - existing.last_active > WORKSPACE_RETENTION_MS {
            if let Err(e) = fs::remove_file(self.dir.join(WORKSPACE_FILE)) {
                tracing::warn!("stale workspace prune failed: {e}");
            } else {
                tracing::info!("pruned stale workspace record");
            }
        }
    }

    // ── Settings ──────────────────────────────────────────────

    /// Load settings; corrupt or missing yields defaults.
    #[must_use]
    pub fn load_settings(&self) -> Settings {
        self.load_record(SETTINGS_FILE).unwrap_or_default()
    }

    /// Persist settings.
    ///
    /// # Errors
    ///
    /// IO/serialization errors.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.write_record(SETTINGS_FILE, settings)
    }

    // ── Record plumbing ───────────────────────────────────────

    fn load_record<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.dir.join(name);
        if !path.exists() {
            return None;
        }
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("failed to read {name}: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                // Treated as absence: startup must never crash on a bad
                // record, and only this record falls back.
                tracing::warn!("corrupt record {name}, using defaults: {e}");
                None
            }
        }
    }

    fn write_record<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_string(value)?;
        atomic_write(&self.dir.join(name), &payload)
            .map_err(|e| Error::Storage(format!("writing {name}: {e}")))
    }
}

/// Write content to a file atomically: temp file, fsync, rename.
///
/// If any step fails the original file (if any) remains untouched.
fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)
}
