//! Saved project model.
//!
//! A [`SavedProject`] is a named, persisted unit of work: a full file set
//! snapshot, the chat transcript, and the per-turn version history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::file::ProjectFile;
use super::message::ChatMessage;

/// An immutable copy of the entire file collection tied to one user turn.
///
/// Captured before the AI begins responding; never mutated afterwards, only
/// replaced wholesale or deleted by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSnapshot {
    /// Capture time (Unix milliseconds).
    pub timestamp: i64,

    /// Deep copy of the file set as of immediately before the turn's response.
    pub files: Vec<ProjectFile>,

    /// The user message text that triggered the turn.
    pub message_text: String,
}

/// Map from user-message id to its pre-turn snapshot.
pub type ProjectHistory = BTreeMap<String, VersionSnapshot>;

/// A named, persisted unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedProject {
    pub id: String,

    /// User-editable display name; not required to be unique.
    pub name: String,

    /// Full file/folder model snapshot.
    pub files: Vec<ProjectFile>,

    pub chat_history: Vec<ChatMessage>,

    /// Unix milliseconds.
    pub last_modified: i64,

    /// Per-turn version snapshots keyed by user-message id.
    #[serde(default)]
    pub code_history: ProjectHistory,
}

impl SavedProject {
    /// Create a project with the given name and file set.
    #[must_use]
    pub fn new(name: impl Into<String>, files: Vec<ProjectFile>, now: i64) -> Self {
        Self {
            id: super::short_id("proj"),
            name: name.into(),
            files,
            chat_history: vec![ChatMessage::welcome(now)],
            last_modified: now,
            code_history: ProjectHistory::new(),
        }
    }

    /// Create the default empty project used when none exists.
    #[must_use]
    pub fn default_project(now: i64) -> Self {
        Self::new("project1", initial_files(now), now)
    }
}

/// The starter file set for a fresh project.
#[must_use]
pub fn initial_files(now: i64) -> Vec<ProjectFile> {
    vec![
        ProjectFile::file(
            "index.html",
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             \x20   <meta charset=\"UTF-8\">\n\
             \x20   <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             \x20   <title>Code Studio</title>\n\
             \x20   <link rel=\"stylesheet\" href=\"style.css\">\n\
             </head>\n\
             <body>\n\
             \x20   <main id=\"app\">\n\
             \x20       <h1>Code Studio</h1>\n\
             \x20       <p>Describe what you want to build and the files will appear here.</p>\n\
             \x20   </main>\n\
             \x20   <script src=\"script.js\"></script>\n\
             </body>\n\
             </html>",
            None,
            now,
        ),
        ProjectFile::file(
            "style.css",
            "body {\n\
             \x20   margin: 0;\n\
             \x20   font-family: system-ui, sans-serif;\n\
             \x20   background: #0b0b0f;\n\
             \x20   color: #e0e0e0;\n\
             \x20   display: flex;\n\
             \x20   min-height: 100vh;\n\
             \x20   align-items: center;\n\
             \x20   justify-content: center;\n\
             }",
            None,
            now,
        ),
        ProjectFile::file(
            "script.js",
            "console.log('Code Studio ready');",
            None,
            now,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project() {
        let p = SavedProject::new("My App", initial_files(5), 5);
        assert!(p.id.starts_with("proj_"));
        assert_eq!(p.name, "My App");
        assert_eq!(p.files.len(), 3);
        assert_eq!(p.chat_history.len(), 1);
        assert!(p.code_history.is_empty());
    }

    #[test]
    fn test_initial_files_have_entry_point() {
        let files = initial_files(0);
        assert!(files.iter().any(|f| f.path == "index.html"));
        assert!(files.iter().all(|f| f.is_file()));
    }

    #[test]
    fn test_default_project_name() {
        assert_eq!(SavedProject::default_project(0).name, "project1");
    }
}
