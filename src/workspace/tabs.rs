//! Open-tab and active-file synchronization.
//!
//! Derived state over the file collection: the set of paths shown as open
//! tabs, and the single "active" path shown in the editor. The invariant is
//! that the active path, when defined, is always a member of the open-tab
//! set, and the set only references existing file-kind paths.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::files::FileSet;

/// Open tabs plus the active file pointer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabState {
    open: BTreeSet<String>,
    active: Option<String>,
}

impl TabState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths currently shown as open tabs.
    #[must_use]
    pub fn open_tabs(&self) -> &BTreeSet<String> {
        &self.open
    }

    /// The active path, if any file is active.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    #[must_use]
    pub fn is_open(&self, path: &str) -> bool {
        self.open.contains(path)
    }

    /// Open a file's tab and make it active.
    pub fn select(&mut self, path: &str) {
        self.open.insert(path.to_string());
        self.active = Some(path.to_string());
    }

    /// Ensure a path is present in the open-tab set without activating it.
    pub fn reveal(&mut self, path: &str) {
        self.open.insert(path.to_string());
    }

    /// Close a tab.
    ///
    /// If it was active, selection falls to another open tab, else to any
    /// remaining file in the set, else to nothing.
    pub fn close(&mut self, path: &str, files: &FileSet) {
        self.open.remove(path);
        if self.active.as_deref() == Some(path) {
            self.active = None;
            if let Some(next) = self.open.iter().next().cloned() {
                self.active = Some(next);
            } else if let Some(next) = files.files().find(|f| f.path != path) {
                self.select(&next.path.clone());
            }
        }
    }

    /// React to file deletion: drop removed paths from consideration
    /// entirely and re-point the active file if it was removed.
    pub fn on_deleted(&mut self, removed_paths: &[String], files: &FileSet) {
        for path in removed_paths {
            self.open.remove(path);
        }
        if let Some(active) = &self.active {
            if removed_paths.contains(active) {
                self.active = None;
                if let Some(next) = self
                    .open
                    .iter()
                    .find(|p| files.get(p).is_some_and(crate::model::ProjectFile::is_file))
                    .cloned()
                {
                    self.active = Some(next);
                } else if let Some(next) = files.first_file() {
                    self.select(&next.path.clone());
                }
            }
        }
        self.retain_existing(files);
    }

    /// Reset to exactly the file-kind paths of a loaded or imported project
    /// and select a default active file (an HTML entry point if present,
    /// else the first file).
    pub fn reset_for(&mut self, files: &FileSet) {
        self.open = files.files().map(|f| f.path.clone()).collect();
        self.active = files
            .get("index.html")
            .filter(|f| f.is_file())
            .or_else(|| files.files().find(|f| f.path.ends_with(".html")))
            .or_else(|| files.first_file())
            .map(|f| f.path.clone());
    }

    /// Drop open tabs whose paths no longer reference file-kind nodes.
    fn retain_existing(&mut self, files: &FileSet) {
        self.open
            .retain(|p| files.get(p).is_some_and(crate::model::ProjectFile::is_file));
        if let Some(active) = &self.active {
            if !self.open.contains(active) {
                self.active = None;
            }
        }
    }

    /// Invariant check used by tests: active ∈ open set (or undefined), and
    /// every open tab references an existing file-kind node.
    #[must_use]
    pub fn is_consistent(&self, files: &FileSet) -> bool {
        let active_ok = match &self.active {
            Some(a) => self.open.contains(a),
            None => true,
        };
        let tabs_ok = self
            .open
            .iter()
            .all(|p| files.get(p).is_some_and(crate::model::ProjectFile::is_file));
        active_ok && tabs_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(paths: &[&str]) -> FileSet {
        let mut fs = FileSet::new();
        for p in paths {
            fs.upsert_declared(&format!("app/{p}"), "x", 1).unwrap();
        }
        fs
    }

    #[test]
    fn test_select_opens_and_activates() {
        let fs = files(&["index.html", "app.js"]);
        let mut tabs = TabState::new();
        tabs.select("app.js");
        assert!(tabs.is_open("app.js"));
        assert_eq!(tabs.active(), Some("app.js"));
        assert!(tabs.is_consistent(&fs));
    }

    #[test]
    fn test_close_falls_back_to_open_tab() {
        let fs = files(&["index.html", "app.js", "style.css"]);
        let mut tabs = TabState::new();
        tabs.select("index.html");
        tabs.select("app.js");
        tabs.close("app.js", &fs);
        assert!(!tabs.is_open("app.js"));
        assert_eq!(tabs.active(), Some("index.html"));
        assert!(tabs.is_consistent(&fs));
    }

    #[test]
    fn test_close_last_tab_falls_back_to_any_file() {
        let fs = files(&["index.html", "app.js"]);
        let mut tabs = TabState::new();
        tabs.select("app.js");
        tabs.close("app.js", &fs);
        // Falls back to a remaining file even though no tab was open.
        assert_eq!(tabs.active(), Some("index.html"));
        assert!(tabs.is_consistent(&fs));
    }

    #[test]
    fn test_deletion_removes_path_entirely() {
        let mut fs = files(&["index.html", "app.js"]);
        let mut tabs = TabState::new();
        tabs.reset_for(&fs);
        tabs.select("app.js");

        let removed = fs.delete("app.js").unwrap();
        tabs.on_deleted(&removed, &fs);

        assert!(!tabs.is_open("app.js"));
        assert_eq!(tabs.active(), Some("index.html"));
        assert!(tabs.is_consistent(&fs));
    }

    #[test]
    fn test_reset_prefers_html_entry_point() {
        let fs = files(&["src/util.js", "index.html", "style.css"]);
        let mut tabs = TabState::new();
        tabs.reset_for(&fs);
        assert_eq!(tabs.active(), Some("index.html"));
        assert_eq!(tabs.open_tabs().len(), 3);
        assert!(tabs.is_consistent(&fs));
    }

    #[test]
    fn test_reset_without_html_takes_first_file() {
        let fs = files(&["b.js", "a.css"]);
        let mut tabs = TabState::new();
        tabs.reset_for(&fs);
        assert_eq!(tabs.active(), Some("b.js"));
    }
}
