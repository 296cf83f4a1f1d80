//! Command implementations.

pub mod chat;
pub mod config;
pub mod export;
pub mod file;
pub mod history;
pub mod import;
pub mod preview;
pub mod project;
pub mod status;
pub mod tab;
pub mod version;

use std::path::Path;

use crate::config::resolve_home;
use crate::error::{Error, Result};
use crate::model::{now_ms, SavedProject};
use crate::storage::{Store, WorkspaceRecord};
use crate::workspace::Workspace;

/// Default sidebar width persisted in the workspace record.
const DEFAULT_SIDEBAR_WIDTH: u32 = 320;

/// Loaded application state shared by every command: the record store, the
/// saved project list, and the live workspace.
pub struct App {
    pub store: Store,
    pub projects: Vec<SavedProject>,
    pub workspace: Workspace,
    pub sidebar_width: u32,
}

impl App {
    /// Open the store and restore state.
    ///
    /// The project list always holds at least one project; a missing or
    /// corrupt workspace record falls back to loading the first project.
    ///
    /// # Errors
    ///
    /// `Config` when no home directory can be resolved; storage IO errors.
    pub fn load(home: Option<&Path>) -> Result<Self> {
        let dir = resolve_home(home)
            .ok_or_else(|| Error::Config("cannot determine a home directory".to_string()))?;
        let store = Store::open(&dir)?;

        let mut projects = store.load_projects();
        if projects.is_empty() {
            projects.push(SavedProject::default_project(now_ms()));
            store.save_projects(&projects)?;
        }

        let (workspace, sidebar_width) = match store.load_workspace() {
            Some(record) => {
                let width = record.sidebar_width.max(1);
                (record.into_workspace(), width)
            }
            None => {
                let mut workspace = Workspace::fresh(now_ms());
                workspace.load_project(&projects[0]);
                (workspace, DEFAULT_SIDEBAR_WIDTH)
            }
        };

        Ok(Self { store, projects, workspace, sidebar_width })
    }

    /// Index of the project the workspace is attached to, if it still
    /// exists in the list.
    #[must_use]
    pub fn active_project_index(&self) -> Option<usize> {
        let id = self.workspace.project_id()?;
        self.projects.iter().position(|p| p.id == id)
    }

    /// Find a project by id.
    ///
    /// # Errors
    ///
    /// `ProjectNotFound`.
    pub fn find_project(&self, id: &str) -> Result<&SavedProject> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::ProjectNotFound { id: id.to_string() })
    }

    /// Mirror the workspace onto its attached project and write both
    /// durable records.
    ///
    /// # Errors
    ///
    /// Project-list write errors. The workspace record write itself is
    /// warn-and-drop per the storage rules.
    pub fn persist(&mut self) -> Result<()> {
        let now = now_ms();
        if let Some(index) = self.active_project_index() {
            self.workspace.sync_into(&mut self.projects[index], now);
        }
        self.store.save_projects(&self.projects)?;
        self.store
            .save_workspace(&WorkspaceRecord::capture(&self.workspace, self.sidebar_width));
        Ok(())
    }
}
