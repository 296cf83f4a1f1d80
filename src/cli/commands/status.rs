//! Status command: workspace overview.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::config::{effective_api_key, resolve_home};
use crate::error::Result;

use super::project::format_ms;
use super::App;

#[derive(Serialize)]
struct StatusOutput<'a> {
    home: String,
    project_id: Option<&'a str>,
    project_name: &'a str,
    projects: usize,
    files: usize,
    open_tabs: usize,
    active_file: Option<&'a str>,
    messages: usize,
    versions: usize,
    api_key_set: bool,
}

/// Execute the status command.
///
/// # Errors
///
/// Config/storage errors.
pub fn execute(home: Option<&Path>, json: bool, quiet: bool) -> Result<()> {
    let app = App::load(home)?;
    let settings = app.store.load_settings();

    let versions = app
        .workspace
        .project_id()
        .map_or(0, |id| app.workspace.ledger().count_for(id));

    let output = StatusOutput {
        home: resolve_home(home).map(|p| p.display().to_string()).unwrap_or_default(),
        project_id: app.workspace.project_id(),
        project_name: app.workspace.project_name(),
        projects: app.projects.len(),
        files: app.workspace.files().file_count(),
        open_tabs: app.workspace.tabs().open_tabs().len(),
        active_file: app.workspace.tabs().active(),
        messages: app.workspace.messages().len(),
        versions,
        api_key_set: effective_api_key(settings.api_key.as_deref()).is_some(),
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else if !quiet {
        println!("{}", "Code Studio".bold());
        println!("Home: {}", output.home);
        println!();
        match output.project_id {
            Some(id) => println!("Project: {} ({})", output.project_name.bold(), id.cyan()),
            None => println!("Project: {}", "none".dimmed()),
        }
        println!("Projects saved: {}", output.projects);
        println!(
            "Files: {} ({} tab(s) open, active: {})",
            output.files,
            output.open_tabs,
            output.active_file.unwrap_or("none"),
        );
        println!("Messages: {}", output.messages);
        println!("Versions: {}", output.versions);
        println!(
            "API key: {}",
            if output.api_key_set { "set".green() } else { "not set".yellow() }
        );
        if let Some((_, latest)) = app.workspace.versions().first() {
            println!("Last snapshot: {}", format_ms(latest.timestamp));
        }
    }
    Ok(())
}
