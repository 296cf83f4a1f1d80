//! Version-history commands.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::cli::HistoryCommands;
use crate::error::{Error, Result};

use super::project::format_ms;
use super::App;

#[derive(Serialize)]
struct VersionRow<'a> {
    message_id: &'a str,
    timestamp: i64,
    files: usize,
    message_text: &'a str,
}

/// Execute a history subcommand against the active project.
///
/// # Errors
///
/// `ProjectNotFound` for an unattached workspace, `SnapshotNotFound`,
/// storage errors.
pub fn execute(
    command: &HistoryCommands,
    home: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let mut app = App::load(home)?;
    let project_id = app
        .workspace
        .project_id()
        .map(ToString::to_string)
        .ok_or_else(|| Error::ProjectNotFound { id: "(none)".to_string() })?;

    match command {
        HistoryCommands::List => {
            let versions = app.workspace.versions();
            if json {
                let rows: Vec<VersionRow<'_>> = versions
                    .iter()
                    .map(|(id, v)| VersionRow {
                        message_id: id.as_str(),
                        timestamp: v.timestamp,
                        files: v.files.len(),
                        message_text: &v.message_text,
                    })
                    .collect();
                println!("{}", serde_json::to_string(&rows)?);
            } else if !quiet {
                if versions.is_empty() {
                    println!("No versions recorded yet.");
                }
                for (id, v) in versions {
                    println!(
                        "{}  {}  {} file(s)  {}",
                        id.cyan(),
                        format_ms(v.timestamp),
                        v.files.len(),
                        truncate(&v.message_text, 60).dimmed(),
                    );
                }
            }
            Ok(())
        }

        HistoryCommands::Restore { message_id } => {
            app.workspace.restore_version(message_id)?;
            app.persist()?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "restored": message_id, "project_id": project_id })
                );
            } else if !quiet {
                println!("Restored files from version {}", message_id.cyan());
            }
            Ok(())
        }

        HistoryCommands::Delete { message_id } => {
            app.workspace.ledger_mut().delete(&project_id, message_id)?;
            app.persist()?;
            if json {
                println!("{}", serde_json::json!({ "deleted": message_id }));
            } else if !quiet {
                println!("Deleted version {}", message_id.cyan());
            }
            Ok(())
        }

        HistoryCommands::Clear => {
            let count = app.workspace.ledger().count_for(&project_id);
            app.workspace.ledger_mut().clear_project(&project_id);
            app.persist()?;
            if json {
                println!("{}", serde_json::json!({ "cleared": count }));
            } else if !quiet {
                println!("Cleared {count} version(s).");
            }
            Ok(())
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 60), "short");
        let long = "é".repeat(80);
        assert_eq!(truncate(&long, 60).chars().count(), 61);
    }
}
