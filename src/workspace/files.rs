//! File collection with path-driven tree building.
//!
//! [`FileSet`] owns a project's flat node collection and implements the
//! declared-path upsert used both by stream materialization and folder
//! import: slash-delimited paths produce their missing ancestor folders on
//! demand, with ids derived from the cumulative relative path so the same
//! folder is never created twice.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{FileKind, ProjectFile};

/// A project's live file/folder collection.
///
/// Invariants held after every mutation:
/// - `path` is unique across the set,
/// - every `parent_id` resolves to a folder node in the set,
/// - a folder's `children` is exactly the set of nodes whose `parent_id`
///   is that folder,
/// - at least one file-kind node exists (the last file cannot be deleted).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSet {
    nodes: Vec<ProjectFile>,
}

/// Split a declared path and strip the leading project-root label.
///
/// `"myapp/src/x.js"` stores at `"src/x.js"`; a bare `"index.html"` is
/// stored as-is. Returns the stored relative path.
#[must_use]
pub fn strip_root_label(declared: &str) -> String {
    let parts: Vec<&str> = declared.split('/').collect();
    if parts.len() > 1 {
        parts[1..].join("/")
    } else {
        declared.to_string()
    }
}

impl FileSet {
    /// Empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing node list (e.g. a loaded snapshot).
    #[must_use]
    pub fn from_nodes(nodes: Vec<ProjectFile>) -> Self {
        Self { nodes }
    }

    /// All nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[ProjectFile] {
        &self.nodes
    }

    /// Consume into the raw node list.
    #[must_use]
    pub fn into_nodes(self) -> Vec<ProjectFile> {
        self.nodes
    }

    /// Deep copy of the node list, for snapshots.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ProjectFile> {
        self.nodes.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ProjectFile> {
        self.nodes.iter().find(|f| f.path == path)
    }

    /// Look up a node by id.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&ProjectFile> {
        self.nodes.iter().find(|f| f.id == id)
    }

    /// Iterate file-kind nodes in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &ProjectFile> {
        self.nodes.iter().filter(|f| f.is_file())
    }

    /// Number of file-kind nodes.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    /// First file-kind node in insertion order.
    #[must_use]
    pub fn first_file(&self) -> Option<&ProjectFile> {
        self.files().next()
    }

    /// Overwrite a file's content in place, bumping `modified_at`.
    ///
    /// Identity (`id`, `parent_id`, position) is untouched.
    ///
    /// # Errors
    ///
    /// `FileNotFound` if no file-kind node exists at `path`.
    pub fn set_content(&mut self, path: &str, content: &str, now: i64) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|f| f.path == path && f.is_file())
            .ok_or_else(|| Error::FileNotFound { path: path.to_string() })?;
        node.content = content.to_string();
        node.modified_at = now;
        Ok(())
    }

    /// Create or overwrite a file at a declared slash-delimited path.
    ///
    /// The first segment is treated as the project-root label and stripped
    /// from the stored path. Missing ancestor folders are created with ids
    /// derived from their cumulative relative path; re-declaring a folder is
    /// idempotent. If a file already exists at the resolved path, only its
    /// content and `modified_at` change. Content is trimmed on write.
    ///
    /// Returns the stored relative path.
    ///
    /// # Errors
    ///
    /// `InvalidPath` for empty paths or paths with empty segments.
    pub fn upsert_declared(&mut self, declared: &str, content: &str, now: i64) -> Result<String> {
        let declared = declared.trim();
        if declared.is_empty() {
            return Err(Error::InvalidPath("empty path".to_string()));
        }
        let parts: Vec<&str> = declared.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(Error::InvalidPath(declared.to_string()));
        }

        // Ancestor folders, skipping the project-root label (parts[0]).
        let mut current_path = String::new();
        let mut parent_id: Option<String> = None;
        let interior = if parts.len() > 1 { &parts[1..parts.len() - 1] } else { &[] };
        for segment in interior {
            let folder_path = if current_path.is_empty() {
                (*segment).to_string()
            } else {
                format!("{current_path}/{segment}")
            };

            // Path lookup, not id lookup: a file already at this path must
            // not gain a duplicate-path folder sibling.
            match self.get(&folder_path) {
                Some(node) if node.kind == FileKind::Folder => {
                    parent_id = Some(node.id.clone());
                }
                Some(node) => {
                    return Err(Error::InvalidPath(format!(
                        "{} already exists as a file",
                        node.path
                    )));
                }
                None => {
                    let folder = ProjectFile::folder(&folder_path, parent_id.clone(), now);
                    let folder_id = folder.id.clone();
                    if let Some(pid) = &parent_id {
                        self.link_child(pid, &folder_id);
                    }
                    self.nodes.push(folder);
                    parent_id = Some(folder_id);
                }
            }
            current_path = folder_path;
        }

        let rel_path = strip_root_label(declared);

        if let Some(existing) = self
            .nodes
            .iter_mut()
            .find(|f| f.path == rel_path && f.is_file())
        {
            existing.content = content.trim().to_string();
            existing.modified_at = now;
        } else {
            let file = ProjectFile::file(&rel_path, content.trim(), parent_id.clone(), now);
            let file_id = file.id.clone();
            if let Some(pid) = &parent_id {
                self.link_child(pid, &file_id);
            }
            self.nodes.push(file);
        }

        Ok(rel_path)
    }

    /// Delete the node at `path` and, for folders, all its descendants.
    ///
    /// Returns the paths of every removed node so derived state (tabs,
    /// active file) can be synchronized.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if no node exists at `path`.
    /// - `LastFileProtected` if the removal would leave no file-kind node;
    ///   the collection is unchanged in that case.
    pub fn delete(&mut self, path: &str) -> Result<Vec<String>> {
        let target = self
            .get(path)
            .ok_or_else(|| Error::FileNotFound { path: path.to_string() })?;

        // Removal set: the node plus all transitive children.
        let mut remove_ids = vec![target.id.clone()];
        let mut i = 0;
        while i < remove_ids.len() {
            let pid = remove_ids[i].clone();
            for child in self.nodes.iter().filter(|f| f.parent_id.as_deref() == Some(&pid)) {
                remove_ids.push(child.id.clone());
            }
            i += 1;
        }

        let survives_a_file = self
            .nodes
            .iter()
            .any(|f| f.is_file() && !remove_ids.contains(&f.id));
        if !survives_a_file {
            return Err(Error::LastFileProtected);
        }

        let parent_id = target.parent_id.clone();
        let target_id = target.id.clone();
        if let Some(pid) = parent_id {
            if let Some(parent) = self.nodes.iter_mut().find(|f| f.id == pid) {
                parent.children.retain(|c| c != &target_id);
            }
        }

        let removed_paths = self
            .nodes
            .iter()
            .filter(|f| remove_ids.contains(&f.id))
            .map(|f| f.path.clone())
            .collect();
        self.nodes.retain(|f| !remove_ids.contains(&f.id));

        Ok(removed_paths)
    }

    /// Verify the structural invariants; used by tests and debug assertions.
    ///
    /// # Errors
    ///
    /// Returns `Other` describing the first violated invariant.
    pub fn check_invariants(&self) -> Result<()> {
        for (i, a) in self.nodes.iter().enumerate() {
            if self.nodes.iter().skip(i + 1).any(|b| b.path == a.path) {
                return Err(Error::Other(format!("duplicate path: {}", a.path)));
            }
        }

        for node in &self.nodes {
            if let Some(pid) = &node.parent_id {
                match self.get_by_id(pid) {
                    Some(parent) if parent.kind == FileKind::Folder => {
                        if !parent.children.contains(&node.id) {
                            return Err(Error::Other(format!(
                                "{} missing from children of {}",
                                node.path, parent.path
                            )));
                        }
                    }
                    _ => {
                        return Err(Error::Other(format!(
                            "dangling parent_id {pid} on {}",
                            node.path
                        )));
                    }
                }
            }
        }

        for folder in self.nodes.iter().filter(|f| f.kind == FileKind::Folder) {
            for child_id in &folder.children {
                match self.get_by_id(child_id) {
                    Some(child) if child.parent_id.as_deref() == Some(&folder.id) => {}
                    _ => {
                        return Err(Error::Other(format!(
                            "stale child {child_id} on {}",
                            folder.path
                        )));
                    }
                }
            }
        }

        if !self.is_empty() && self.file_count() == 0 {
            return Err(Error::Other("no file-kind node remains".to_string()));
        }

        Ok(())
    }

    fn link_child(&mut self, parent_id: &str, child_id: &str) {
        if let Some(parent) = self.nodes.iter_mut().find(|f| f.id == parent_id) {
            parent.children.push(child_id.to_string());
        }
    }
}
