//! Workspace state.
//!
//! The workspace is the currently active, possibly-unsaved file/message/tab
//! state, distinct from the list of named saved projects. It is an explicit
//! session context: every component that used to be ambient (file set,
//! transcript, tabs, version ledger, project binding) is owned here and
//! mutated through ordinary methods, single-writer by construction.
//!
//! # Submodules
//!
//! - [`files`] - file collection and path-driven tree building
//! - [`tabs`] - open-tab / active-file synchronization
//! - [`history`] - per-project version snapshots

pub mod files;
pub mod history;
pub mod tabs;

pub use files::{strip_root_label, FileSet};
pub use history::VersionLedger;
pub use tabs::TabState;

use crate::error::{Error, Result};
use crate::model::{
    initial_files, ChatMessage, ImageAttachment, ProjectFile, Role, SavedProject,
    VersionSnapshot,
};
use crate::stream::FileEvent;

/// Outcome of starting an AI turn.
#[derive(Debug, Clone)]
pub struct TurnStart {
    /// Id of the user message that triggered the turn (the ledger key).
    pub user_message_id: String,

    /// Id of the in-flight model reply message.
    pub model_message_id: String,

    /// Whether a pre-turn version snapshot was recorded. False for the
    /// first qualifying turn of a conversation and for unattached
    /// workspaces.
    pub snapshot_taken: bool,
}

/// The live working state: files, transcript, tabs, ledger, project binding.
#[derive(Debug, Default)]
pub struct Workspace {
    files: FileSet,
    messages: Vec<ChatMessage>,
    tabs: TabState,
    ledger: VersionLedger,
    project_id: Option<String>,
    project_name: String,
}

impl Workspace {
    /// Fresh workspace with the starter file set and welcome transcript,
    /// not attached to any saved project.
    #[must_use]
    pub fn fresh(now: i64) -> Self {
        let files = FileSet::from_nodes(initial_files(now));
        let mut tabs = TabState::new();
        tabs.reset_for(&files);
        Self {
            files,
            messages: vec![ChatMessage::welcome(now)],
            tabs,
            ledger: VersionLedger::new(),
            project_id: None,
            project_name: String::new(),
        }
    }

    /// Reassemble a workspace from persisted parts.
    #[must_use]
    pub fn from_parts(
        files: FileSet,
        messages: Vec<ChatMessage>,
        tabs: TabState,
        ledger: VersionLedger,
        project_id: Option<String>,
        project_name: String,
    ) -> Self {
        Self { files, messages, tabs, ledger, project_id, project_name }
    }

    // ── Accessors ─────────────────────────────────────────────

    #[must_use]
    pub fn files(&self) -> &FileSet {
        &self.files
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn tabs(&self) -> &TabState {
        &self.tabs
    }

    #[must_use]
    pub fn ledger(&self) -> &VersionLedger {
        &self.ledger
    }

    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn ledger_mut(&mut self) -> &mut VersionLedger {
        &mut self.ledger
    }

    // ── File operations ───────────────────────────────────────

    /// Overwrite a file's content from a user edit (no trimming).
    ///
    /// # Errors
    ///
    /// `FileNotFound` if no file exists at `path`.
    pub fn edit_file(&mut self, path: &str, content: &str, now: i64) -> Result<()> {
        self.files.set_content(path, content, now)
    }

    /// Delete a file or folder, keeping tabs and the active pointer in sync.
    ///
    /// # Errors
    ///
    /// `FileNotFound` / `LastFileProtected` from the underlying collection;
    /// on error no state changes.
    pub fn delete_file(&mut self, path: &str) -> Result<Vec<String>> {
        let removed = self.files.delete(path)?;
        self.tabs.on_deleted(&removed, &self.files);
        Ok(removed)
    }

    /// Open a file's tab and make it active.
    ///
    /// # Errors
    ///
    /// `FileNotFound` if `path` is not a file-kind node.
    pub fn select_file(&mut self, path: &str) -> Result<()> {
        let exists = self.files.get(path).is_some_and(ProjectFile::is_file);
        if !exists {
            return Err(Error::FileNotFound { path: path.to_string() });
        }
        self.tabs.select(path);
        Ok(())
    }

    /// Close a tab; the active pointer falls back per the tab rules.
    pub fn close_tab(&mut self, path: &str) {
        self.tabs.close(path, &self.files);
    }

    // ── AI turn flow ──────────────────────────────────────────

    /// Start an AI turn: append the user message and an in-flight model
    /// reply, and record the pre-turn version snapshot.
    ///
    /// The first qualifying user turn of a conversation is not snapshotted
    /// (the files are still in their initial state), and no snapshot is
    /// ever written without an active project id.
    pub fn begin_turn(
        &mut self,
        text: &str,
        images: Vec<ImageAttachment>,
        now: i64,
    ) -> TurnStart {
        let had_user_turn = self.messages.iter().any(|m| m.role == Role::User);

        let user_msg = ChatMessage::user(text, images, now);
        let model_msg = ChatMessage::streaming_model(now);
        let start = TurnStart {
            user_message_id: user_msg.id.clone(),
            model_message_id: model_msg.id.clone(),
            snapshot_taken: false,
        };

        let snapshot_taken = match (&self.project_id, had_user_turn) {
            (Some(project_id), true) => {
                self.ledger.record(
                    project_id,
                    &user_msg.id,
                    text,
                    &self.files.snapshot(),
                    now,
                );
                true
            }
            _ => false,
        };

        self.messages.push(user_msg);
        self.messages.push(model_msg);
        TurnStart { snapshot_taken, ..start }
    }

    /// Mirror the raw accumulated reply into the in-flight model message.
    pub fn set_streaming_text(&mut self, model_message_id: &str, transcript: &str) {
        if let Some(msg) = self.messages.iter_mut().find(|m| m.id == model_message_id) {
            msg.text = transcript.to_string();
        }
    }

    /// Apply one materialize event: create/overwrite the file, reveal its
    /// tab, and switch the active file if this was the most recently
    /// completed block of the scan.
    ///
    /// # Errors
    ///
    /// `InvalidPath` from the declared-path upsert.
    pub fn apply_event(&mut self, event: &FileEvent, now: i64) -> Result<String> {
        let rel_path = self
            .files
            .upsert_declared(&event.declared_path, &event.content, now)?;
        self.tabs.reveal(&rel_path);
        if event.is_latest {
            self.tabs.select(&rel_path);
        }
        Ok(rel_path)
    }

    /// Finalize the in-flight model reply, streaming or cancelled alike.
    pub fn finish_turn(&mut self, model_message_id: &str) {
        if let Some(msg) = self.messages.iter_mut().find(|m| m.id == model_message_id) {
            msg.is_streaming = false;
        }
    }

    /// Conversation history for the request payload: welcome and in-flight
    /// messages excluded.
    #[must_use]
    pub fn api_history(&self) -> Vec<&ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.id != crate::model::WELCOME_MESSAGE_ID && !m.is_streaming)
            .collect()
    }

    // ── Version history ───────────────────────────────────────

    /// Replace the live file collection with a snapshot's files.
    ///
    /// Chat history and the remaining snapshots are untouched.
    ///
    /// # Errors
    ///
    /// `SnapshotNotFound`, or `ProjectNotFound` for an unattached workspace.
    pub fn restore_version(&mut self, message_id: &str) -> Result<()> {
        let project_id = self
            .project_id
            .clone()
            .ok_or_else(|| Error::ProjectNotFound { id: "(none)".to_string() })?;
        let files = self.ledger.restore(&project_id, message_id)?;
        self.files = FileSet::from_nodes(files);
        self.tabs.reset_for(&self.files);
        Ok(())
    }

    /// Snapshots for the attached project, newest first.
    #[must_use]
    pub fn versions(&self) -> Vec<(&String, &VersionSnapshot)> {
        match &self.project_id {
            Some(id) => self.ledger.versions_for(id),
            None => Vec::new(),
        }
    }

    // ── Project lifecycle ─────────────────────────────────────

    /// Load a saved project, replacing the whole working state.
    ///
    /// Tabs reset to exactly the project's file-kind paths with the default
    /// active file.
    pub fn load_project(&mut self, project: &SavedProject) {
        self.files = FileSet::from_nodes(project.files.clone());
        self.messages.clone_from(&project.chat_history);
        self.tabs.reset_for(&self.files);
        self.ledger
            .set_history_for(&project.id, project.code_history.clone());
        self.project_id = Some(project.id.clone());
        self.project_name.clone_from(&project.name);
    }

    /// Bind the workspace to a project record (create-on-first-turn).
    pub fn attach_project(&mut self, id: &str, name: &str) {
        self.project_id = Some(id.to_string());
        self.project_name = name.to_string();
    }

    /// Mirror the live state onto the attached project's record.
    pub fn sync_into(&self, project: &mut SavedProject, now: i64) {
        project.files = self.files.snapshot();
        project.chat_history.clone_from(&self.messages);
        project.code_history = self.ledger.history_for(&project.id);
        project.last_modified = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::now_ms;
    use crate::stream::ExtractSession;

    fn attached() -> Workspace {
        let mut ws = Workspace::fresh(1);
        ws.attach_project("proj_test", "Test");
        ws
    }

    #[test]
    fn test_fresh_workspace_shape() {
        let ws = Workspace::fresh(1);
        assert_eq!(ws.files().file_count(), 3);
        assert_eq!(ws.tabs().active(), Some("index.html"));
        assert_eq!(ws.messages().len(), 1);
        assert!(ws.project_id().is_none());
    }

    #[test]
    fn test_first_turn_not_snapshotted() {
        let mut ws = attached();
        let first = ws.begin_turn("build a game", Vec::new(), 10);
        assert!(!first.snapshot_taken);
        ws.finish_turn(&first.model_message_id);

        let second = ws.begin_turn("make it blue", Vec::new(), 20);
        assert!(second.snapshot_taken);
        assert_eq!(ws.ledger().count_for("proj_test"), 1);
        assert!(ws
            .ledger()
            .restore("proj_test", &second.user_message_id)
            .is_ok());
    }

    #[test]
    fn test_unattached_workspace_keeps_no_history() {
        let mut ws = Workspace::fresh(1);
        ws.begin_turn("one", Vec::new(), 10);
        let second = ws.begin_turn("two", Vec::new(), 20);
        assert!(!second.snapshot_taken);
        assert!(ws.versions().is_empty());
    }

    #[test]
    fn test_snapshot_captures_pre_turn_files() {
        let mut ws = attached();
        let first = ws.begin_turn("one", Vec::new(), 10);
        ws.finish_turn(&first.model_message_id);

        let before = ws.files().get("index.html").unwrap().content.clone();
        let turn = ws.begin_turn("two", Vec::new(), 20);

        // AI mutates the file during the turn.
        ws.edit_file("index.html", "<h1>changed</h1>", 21).unwrap();

        let snapshot = ws
            .ledger()
            .restore("proj_test", &turn.user_message_id)
            .unwrap();
        let snap_html = snapshot.iter().find(|f| f.path == "index.html").unwrap();
        assert_eq!(snap_html.content, before);
    }

    #[test]
    fn test_restore_round_trip() {
        let mut ws = attached();
        let first = ws.begin_turn("one", Vec::new(), 10);
        ws.finish_turn(&first.model_message_id);
        let turn = ws.begin_turn("two", Vec::new(), 20);

        ws.edit_file("index.html", "mutated", 21).unwrap();
        ws.delete_file("script.js").unwrap();

        ws.restore_version(&turn.user_message_id).unwrap();
        assert!(ws.files().get("script.js").is_some());
        assert_ne!(ws.files().get("index.html").unwrap().content, "mutated");
        assert!(ws.tabs().is_consistent(ws.files()));
    }

    #[test]
    fn test_apply_events_switches_active_to_latest() {
        let mut ws = attached();
        let mut session = ExtractSession::new();
        let events = session.feed(
            "<file name='app/index.html'>a</file><file name='app/app.js'>b</file>",
        );
        for event in &events {
            ws.apply_event(event, now_ms()).unwrap();
        }
        assert_eq!(ws.tabs().active(), Some("app.js"));
        assert!(ws.tabs().is_open("app.js"));
        assert!(ws.tabs().is_open("index.html"), "earlier file stays open");
        assert!(ws.tabs().is_consistent(ws.files()));
    }

    #[test]
    fn test_api_history_excludes_welcome_and_streaming() {
        let mut ws = attached();
        let turn = ws.begin_turn("hello", Vec::new(), 10);
        let history = ws.api_history();
        assert_eq!(history.len(), 1, "welcome and in-flight reply excluded");
        assert_eq!(history[0].role, Role::User);

        ws.finish_turn(&turn.model_message_id);
        assert_eq!(ws.api_history().len(), 2);
    }

    #[test]
    fn test_load_project_resets_tabs() {
        let mut ws = Workspace::fresh(1);
        let mut project = SavedProject::new("Other", initial_files(2), 2);
        project.files.retain(|f| f.path != "script.js");

        ws.load_project(&project);
        assert_eq!(ws.project_id(), Some(project.id.as_str()));
        assert_eq!(ws.tabs().open_tabs().len(), 2);
        assert_eq!(ws.tabs().active(), Some("index.html"));
    }

    #[test]
    fn test_streaming_text_mirrors_transcript() {
        let mut ws = attached();
        let turn = ws.begin_turn("go", Vec::new(), 10);
        ws.set_streaming_text(&turn.model_message_id, "partial <file name=\"x");
        let msg = ws
            .messages()
            .iter()
            .find(|m| m.id == turn.model_message_id)
            .unwrap();
        assert!(msg.is_streaming);
        assert!(msg.text.contains("partial"));
    }
}
