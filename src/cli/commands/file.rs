//! File commands for the active workspace.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::cli::FileCommands;
use crate::error::{Error, Result};
use crate::model::FileKind;

use super::App;

#[derive(Serialize)]
struct FileRow<'a> {
    path: &'a str,
    kind: FileKind,
    bytes: usize,
    open: bool,
    active: bool,
}

/// Execute a file subcommand.
///
/// # Errors
///
/// `FileNotFound`, `LastFileProtected`, storage errors.
pub fn execute(
    command: &FileCommands,
    home: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let mut app = App::load(home)?;

    match command {
        FileCommands::List => {
            let tabs = app.workspace.tabs();
            let mut rows: Vec<FileRow<'_>> = app
                .workspace
                .files()
                .nodes()
                .iter()
                .map(|f| FileRow {
                    path: &f.path,
                    kind: f.kind,
                    bytes: f.content.len(),
                    open: tabs.is_open(&f.path),
                    active: tabs.active() == Some(f.path.as_str()),
                })
                .collect();
            rows.sort_by(|a, b| a.path.cmp(b.path));

            if json {
                println!("{}", serde_json::to_string(&rows)?);
            } else if !quiet {
                for row in &rows {
                    let marker = if row.active {
                        "*".green().bold()
                    } else if row.open {
                        "o".normal()
                    } else {
                        " ".normal()
                    };
                    match row.kind {
                        FileKind::Folder => println!("{marker} {}/", row.path.blue().bold()),
                        FileKind::File => {
                            println!("{marker} {} ({} bytes)", row.path, row.bytes);
                        }
                    }
                }
            }
            Ok(())
        }

        FileCommands::Show { path } => {
            let file = app
                .workspace
                .files()
                .get(path)
                .filter(|f| f.is_file())
                .ok_or_else(|| Error::FileNotFound { path: path.clone() })?;
            if json {
                println!("{}", serde_json::to_string(file)?);
            } else {
                println!("{}", file.content);
            }
            Ok(())
        }

        FileCommands::Delete { path } => {
            let removed = app.workspace.delete_file(path)?;
            app.persist()?;
            if json {
                println!("{}", serde_json::json!({ "removed": removed }));
            } else if !quiet {
                println!("Deleted {} node(s): {}", removed.len(), removed.join(", "));
            }
            Ok(())
        }
    }
}
