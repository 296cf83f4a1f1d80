//! Tab commands.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::cli::TabCommands;
use crate::error::Result;

use super::App;

#[derive(Serialize)]
struct TabsOutput<'a> {
    open: Vec<&'a str>,
    active: Option<&'a str>,
}

/// Execute a tab subcommand.
///
/// # Errors
///
/// `FileNotFound` when opening a path with no file, storage errors.
pub fn execute(command: &TabCommands, home: Option<&Path>, json: bool, quiet: bool) -> Result<()> {
    let mut app = App::load(home)?;

    match command {
        TabCommands::Open { path } => {
            app.workspace.select_file(path)?;
            app.persist()?;
            if json {
                println!("{}", serde_json::json!({ "active": path }));
            } else if !quiet {
                println!("Active file: {}", path.bold());
            }
            Ok(())
        }

        TabCommands::Close { path } => {
            app.workspace.close_tab(path);
            app.persist()?;
            let active = app.workspace.tabs().active().map(ToString::to_string);
            if json {
                println!("{}", serde_json::json!({ "closed": path, "active": active }));
            } else if !quiet {
                match active {
                    Some(next) => println!("Closed {path}; active file is now {}", next.bold()),
                    None => println!("Closed {path}; no file is active"),
                }
            }
            Ok(())
        }

        TabCommands::List => {
            let tabs = app.workspace.tabs();
            if json {
                let output = TabsOutput {
                    open: tabs.open_tabs().iter().map(String::as_str).collect(),
                    active: tabs.active(),
                };
                println!("{}", serde_json::to_string(&output)?);
            } else if !quiet {
                for path in tabs.open_tabs() {
                    if tabs.active() == Some(path.as_str()) {
                        println!("{} {}", "*".green().bold(), path.bold());
                    } else {
                        println!("  {path}");
                    }
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_then_close_keeps_invariant() {
        let tmp = tempfile::tempdir().unwrap();
        execute(
            &TabCommands::Open { path: "style.css".to_string() },
            Some(tmp.path()),
            true,
            true,
        )
        .unwrap();

        let app = App::load(Some(tmp.path())).unwrap();
        assert_eq!(app.workspace.tabs().active(), Some("style.css"));
        drop(app);

        execute(
            &TabCommands::Close { path: "style.css".to_string() },
            Some(tmp.path()),
            true,
            true,
        )
        .unwrap();

        let app = App::load(Some(tmp.path())).unwrap();
        assert_ne!(app.workspace.tabs().active(), Some("style.css"));
        assert!(app.workspace.tabs().is_consistent(app.workspace.files()));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(execute(
            &TabCommands::Open { path: "nope.js".to_string() },
            Some(tmp.path()),
            true,
            true,
        )
        .is_err());
    }
}
