//! Folder import.
//!
//! Turns a batch of (relative-path, text) pairs into one complete file
//! collection in a single pass: folders first, then files. The first path
//! segment is the imported project's display name and is stripped from the
//! stored paths exactly like AI-declared paths.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::workspace::FileSet;

/// Directories skipped when reading a folder from disk.
const SKIP_DIRS: &[&str] = &["node_modules", "target", "dist", ".git"];

/// A folder import ready to adopt: display name plus the built file set.
#[derive(Debug)]
pub struct ImportedFolder {
    pub name: String,
    pub files: FileSet,
}

/// Build a file collection from (relative-path, content) pairs.
///
/// Paths must share a leading root segment (the folder the user picked);
/// that segment becomes the project display name. Folder nodes for all
/// interior segments are created before any file is placed.
///
/// # Errors
///
/// `InvalidArgument` for an empty batch, `InvalidPath` for malformed paths.
pub fn from_entries(entries: &[(String, String)], now: i64) -> Result<ImportedFolder> {
    let first = entries
        .first()
        .ok_or_else(|| Error::InvalidArgument("nothing to import".to_string()))?;
    let name = first
        .0
        .split('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("ImportedProject")
        .to_string();

    let mut files = FileSet::new();
    for (path, content) in entries {
        files.upsert_declared(path, content, now)?;
    }

    Ok(ImportedFolder { name, files })
}

/// Read a directory tree from disk into an import batch and build it.
///
/// Only UTF-8 text files are taken; binaries, hidden entries, and common
/// build/dependency directories are skipped. The directory's own name is
/// the leading segment of every entry path.
///
/// # Errors
///
/// `InvalidArgument` if `dir` is not a directory or contains no importable
/// files; IO errors from reading.
pub fn from_directory(dir: &Path, now: i64) -> Result<ImportedFolder> {
    if !dir.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "not a directory: {}",
            dir.display()
        )));
    }
    let root_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "ImportedProject".to_string());

    let mut entries = Vec::new();
    collect_entries(dir, &root_name, &mut entries)?;
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    if entries.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "no text files found under {}",
            dir.display()
        )));
    }
    from_entries(&entries, now)
}

fn collect_entries(
    dir: &Path,
    prefix: &str,
    entries: &mut Vec<(String, String)>,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            if SKIP_DIRS.contains(&name.as_str()) {
                continue;
            }
            collect_entries(&path, &format!("{prefix}/{name}"), entries)?;
        } else if let Ok(content) = fs::read_to_string(&path) {
            entries.push((format!("{prefix}/{name}"), content));
        }
        // Non-UTF-8 files are silently skipped.
    }
    Ok(())
}
