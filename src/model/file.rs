//! File/folder model.
//!
//! A project's files and folders form a flat collection of [`ProjectFile`]
//! nodes with parent/child links. `path` is the canonical lookup key; ids are
//! derived deterministically from the relative path so re-declaring the same
//! node is idempotent.

use serde::{Deserialize, Serialize};

/// Node kind: a leaf file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Folder,
}

/// Language derived from the filename suffix.
///
/// Used only for syntax grouping and preview assembly, never for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
    Javascript,
    Typescript,
    Json,
    Other,
}

impl Language {
    /// Derive the language from a filename suffix.
    #[must_use]
    pub fn from_filename(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".html") || lower.ends_with(".htm") {
            Self::Html
        } else if lower.ends_with(".css") {
            Self::Css
        } else if lower.ends_with(".js") || lower.ends_with(".jsx") || lower.ends_with(".mjs") {
            Self::Javascript
        } else if lower.ends_with(".ts") || lower.ends_with(".tsx") {
            Self::Typescript
        } else if lower.ends_with(".json") {
            Self::Json
        } else {
            Self::Other
        }
    }

    /// Lowercase language tag, as used in fenced code blocks.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Json => "json",
            Self::Other => "text",
        }
    }
}

/// A node in the file/folder model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Stable identifier, unique within a project's file set.
    /// Derived from the relative path: `file_<sanitized>` / `folder_<sanitized>`.
    pub id: String,

    /// Leaf display name (no path separators).
    pub name: String,

    /// Full path relative to the project root; unique within a project.
    pub path: String,

    /// File or folder.
    pub kind: FileKind,

    /// Derived from the filename suffix.
    pub language: Language,

    /// Text payload; empty for folders.
    pub content: String,

    /// Owning folder's id; `None` means project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Child ids, maintained only on folder nodes, in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,

    /// Creation timestamp (Unix milliseconds).
    pub created_at: i64,

    /// Last content-write timestamp (Unix milliseconds).
    pub modified_at: i64,
}

/// Sanitize a relative path into an id fragment.
///
/// Every non-alphanumeric character maps to `_`, so the same path always
/// yields the same id and re-declaring a folder never duplicates it.
#[must_use]
pub fn path_id_fragment(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

impl ProjectFile {
    /// Create a file node at a relative path.
    #[must_use]
    pub fn file(rel_path: &str, content: &str, parent_id: Option<String>, now: i64) -> Self {
        let name = rel_path.rsplit('/').next().unwrap_or(rel_path).to_string();
        Self {
            id: format!("file_{}", path_id_fragment(rel_path)),
            language: Language::from_filename(&name),
            name,
            path: rel_path.to_string(),
            kind: FileKind::File,
            content: content.to_string(),
            parent_id,
            children: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Create a folder node at a relative path.
    #[must_use]
    pub fn folder(rel_path: &str, parent_id: Option<String>, now: i64) -> Self {
        let name = rel_path.rsplit('/').next().unwrap_or(rel_path).to_string();
        Self {
            id: format!("folder_{}", path_id_fragment(rel_path)),
            name,
            path: rel_path.to_string(),
            kind: FileKind::Folder,
            language: Language::Other,
            content: String::new(),
            parent_id,
            children: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }

    /// True for file-kind nodes.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_filename() {
        assert_eq!(Language::from_filename("index.html"), Language::Html);
        assert_eq!(Language::from_filename("main.CSS"), Language::Css);
        assert_eq!(Language::from_filename("app.jsx"), Language::Javascript);
        assert_eq!(Language::from_filename("types.ts"), Language::Typescript);
        assert_eq!(Language::from_filename("data.json"), Language::Json);
        assert_eq!(Language::from_filename("logo.svg"), Language::Other);
    }

    #[test]
    fn test_file_id_is_deterministic() {
        let a = ProjectFile::file("src/app.js", "x", None, 1);
        let b = ProjectFile::file("src/app.js", "y", None, 2);
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, "file_src_app_js");
        assert_eq!(a.name, "app.js");
    }

    #[test]
    fn test_folder_node_shape() {
        let f = ProjectFile::folder("src/components", Some("folder_src".into()), 7);
        assert_eq!(f.kind, FileKind::Folder);
        assert_eq!(f.id, "folder_src_components");
        assert_eq!(f.name, "components");
        assert!(f.content.is_empty());
        assert_eq!(f.parent_id.as_deref(), Some("folder_src"));
    }
}
