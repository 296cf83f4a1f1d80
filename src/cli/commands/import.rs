//! Import command: bring a folder from disk in as a new project.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::error::Result;
use crate::importer;
use crate::model::{now_ms, SavedProject};

use super::App;

#[derive(Serialize)]
struct ImportOutput<'a> {
    project_id: &'a str,
    name: &'a str,
    files: usize,
}

/// Execute the import command.
///
/// # Errors
///
/// `InvalidArgument` for an unreadable or empty directory, storage errors.
pub fn execute(dir: &Path, home: Option<&Path>, json: bool, quiet: bool) -> Result<()> {
    let mut app = App::load(home)?;

    let now = now_ms();
    let imported = importer::from_directory(dir, now)?;
    let file_count = imported.files.file_count();

    let project = SavedProject::new(imported.name, imported.files.into_nodes(), now);
    app.workspace.load_project(&project);
    app.projects.push(project);
    app.persist()?;

    let Some(project) = app.projects.last() else { return Ok(()) };
    if json {
        let output = ImportOutput {
            project_id: &project.id,
            name: &project.name,
            files: file_count,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if !quiet {
        println!(
            "Imported {} as {} ({}), {} file(s)",
            dir.display(),
            project.name.bold(),
            project.id.cyan(),
            file_count,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_import_creates_and_activates_project() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("home");
        let site = tmp.path().join("mysite");
        fs::create_dir_all(site.join("css")).unwrap();
        fs::write(site.join("index.html"), "<html></html>").unwrap();
        fs::write(site.join("css/main.css"), "body{}").unwrap();

        execute(&site, Some(&home), true, true).unwrap();

        let app = App::load(Some(&home)).unwrap();
        assert_eq!(app.projects.len(), 2, "default plus imported");
        let active = app.workspace.project_id().unwrap();
        let project = app.find_project(active).unwrap();
        assert_eq!(project.name, "mysite");
        assert!(app.workspace.files().get("css/main.css").is_some());
        assert_eq!(app.workspace.tabs().active(), Some("index.html"));
    }
}
