//! Export command: materialize the current file set as a directory tree.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

use super::App;

#[derive(Serialize)]
struct ExportOutput<'a> {
    dir: String,
    files: &'a [String],
}

/// Execute the export command.
///
/// Folders come from the file paths themselves; empty folders are not
/// materialized. Existing destination files are only overwritten with
/// `--force`.
///
/// # Errors
///
/// `InvalidArgument` when a destination file exists without `--force`;
/// IO errors from writing.
pub fn execute(
    dir: &Path,
    force: bool,
    home: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let app = App::load(home)?;

    let mut written = Vec::new();
    for file in app.workspace.files().files() {
        let dest = dir.join(&file.path);
        if dest.exists() && !force {
            return Err(Error::InvalidArgument(format!(
                "{} already exists (use --force to overwrite)",
                dest.display()
            )));
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &file.content)?;
        written.push(file.path.clone());
    }

    if json {
        let output = ExportOutput { dir: dir.display().to_string(), files: &written };
        println!("{}", serde_json::to_string(&output)?);
    } else if !quiet {
        println!("Exported {} file(s) to {}", written.len(), dir.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("home");
        let out = tmp.path().join("out");

        execute(&out, false, Some(&home), true, true).unwrap();
        assert!(out.join("index.html").exists());
        assert!(out.join("style.css").exists());

        // Second export without --force refuses to clobber.
        let err = execute(&out, false, Some(&home), true, true).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        execute(&out, true, Some(&home), true, true).unwrap();
    }
}
