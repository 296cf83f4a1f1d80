//! Project lifecycle commands.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::cli::ProjectCommands;
use crate::error::{Error, Result};
use crate::model::{initial_files, now_ms, SavedProject};

use super::App;

#[derive(Serialize)]
struct ProjectRow<'a> {
    id: &'a str,
    name: &'a str,
    files: usize,
    versions: usize,
    last_modified: i64,
    active: bool,
}

#[derive(Serialize)]
struct MutationOutput<'a> {
    id: &'a str,
    name: &'a str,
}

/// Execute a project subcommand.
///
/// # Errors
///
/// `ProjectNotFound`, `RequiredField`, storage errors.
pub fn execute(
    command: &ProjectCommands,
    home: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let mut app = App::load(home)?;

    match command {
        ProjectCommands::List => {
            let active_id = app.workspace.project_id().map(ToString::to_string);
            let rows: Vec<ProjectRow<'_>> = app
                .projects
                .iter()
                .map(|p| ProjectRow {
                    id: &p.id,
                    name: &p.name,
                    files: p.files.iter().filter(|f| f.is_file()).count(),
                    versions: p.code_history.len(),
                    last_modified: p.last_modified,
                    active: active_id.as_deref() == Some(p.id.as_str()),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string(&rows)?);
            } else if !quiet {
                for row in &rows {
                    let marker = if row.active { "*".green().bold() } else { " ".normal() };
                    println!(
                        "{marker} {}  {}  {} file(s), {} version(s), modified {}",
                        row.id.cyan(),
                        row.name.bold(),
                        row.files,
                        row.versions,
                        format_ms(row.last_modified),
                    );
                }
            }
            Ok(())
        }

        ProjectCommands::New { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::RequiredField { field: "project name".to_string() });
            }
            let now = now_ms();
            let project = SavedProject::new(name, initial_files(now), now);
            app.workspace.load_project(&project);
            app.projects.push(project);
            app.persist()?;

            let created = app.projects.last().map(|p| (p.id.clone(), p.name.clone()));
            if let Some((id, name)) = created {
                emit_mutation(&id, &name, "Created project", json, quiet)?;
            }
            Ok(())
        }

        ProjectCommands::Rename { id, name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::RequiredField { field: "project name".to_string() });
            }
            let target_id = match id {
                Some(id) => id.clone(),
                None => app
                    .workspace
                    .project_id()
                    .map(ToString::to_string)
                    .ok_or_else(|| Error::ProjectNotFound { id: "(none)".to_string() })?,
            };
            let project = app
                .projects
                .iter_mut()
                .find(|p| p.id == target_id)
                .ok_or_else(|| Error::ProjectNotFound { id: target_id.clone() })?;
            project.name = name.to_string();
            project.last_modified = now_ms();

            if app.workspace.project_id() == Some(target_id.as_str()) {
                app.workspace.attach_project(&target_id, name);
            }
            app.persist()?;
            emit_mutation(&target_id, name, "Renamed project", json, quiet)
        }

        ProjectCommands::Delete { id } => {
            let index = app
                .projects
                .iter()
                .position(|p| p.id == *id)
                .ok_or_else(|| Error::ProjectNotFound { id: id.clone() })?;
            let removed = app.projects.remove(index);
            app.workspace.ledger_mut().clear_project(&removed.id);

            // At least one project always exists; deleting the active one
            // switches to the next.
            if app.projects.is_empty() {
                app.projects.push(SavedProject::default_project(now_ms()));
            }
            if app.workspace.project_id() == Some(removed.id.as_str()) {
                let next = app.projects[0].clone();
                app.workspace.load_project(&next);
            }
            let keep: Vec<String> = app.projects.iter().map(|p| p.id.clone()).collect();
            app.workspace
                .ledger_mut()
                .retain_projects(|id| keep.iter().any(|k| k == id));
            app.persist()?;
            emit_mutation(&removed.id, &removed.name, "Deleted project", json, quiet)
        }

        ProjectCommands::Load { id } => {
            let project = app.find_project(id)?.clone();
            app.workspace.load_project(&project);
            app.persist()?;
            emit_mutation(&project.id, &project.name, "Loaded project", json, quiet)
        }
    }
}

fn emit_mutation(id: &str, name: &str, verb: &str, json: bool, quiet: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&MutationOutput { id, name })?);
    } else if !quiet {
        println!("{verb} {} ({})", name.bold(), id.cyan());
    }
    Ok(())
}

pub(super) fn format_ms(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (tempfile::TempDir, App) {
        let tmp = tempfile::tempdir().unwrap();
        let app = App::load(Some(tmp.path())).unwrap();
        (tmp, app)
    }

    #[test]
    fn test_delete_last_project_recreates_default() {
        let (tmp, app) = app();
        let id = app.projects[0].id.clone();
        drop(app);

        execute(&ProjectCommands::Delete { id: id.clone() }, Some(tmp.path()), true, true)
            .unwrap();

        let reloaded = App::load(Some(tmp.path())).unwrap();
        assert_eq!(reloaded.projects.len(), 1);
        assert_ne!(reloaded.projects[0].id, id);
        assert_eq!(reloaded.projects[0].name, "project1");
        assert_eq!(
            reloaded.workspace.project_id(),
            Some(reloaded.projects[0].id.as_str())
        );
    }

    #[test]
    fn test_new_project_becomes_active() {
        let (tmp, first) = app();
        drop(first);
        execute(
            &ProjectCommands::New { name: "Game".to_string() },
            Some(tmp.path()),
            true,
            true,
        )
        .unwrap();

        let reloaded = App::load(Some(tmp.path())).unwrap();
        assert_eq!(reloaded.projects.len(), 2);
        let active = reloaded.workspace.project_id().unwrap();
        let project = reloaded.find_project(active).unwrap();
        assert_eq!(project.name, "Game");
    }

    #[test]
    fn test_rename_requires_non_empty_name() {
        let (tmp, app) = app();
        let id = app.projects[0].id.clone();
        drop(app);
        let err = execute(
            &ProjectCommands::Rename { id: Some(id), name: "  ".to_string() },
            Some(tmp.path()),
            true,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, Error::RequiredField { .. }));
    }
}
