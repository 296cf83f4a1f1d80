//! Chat command: one streamed AI turn.
//!
//! Sends the prompt with the current file context, feeds the streamed reply
//! through the extraction session, and materializes completed file blocks
//! into the workspace as they arrive. Ctrl-C stops generation; files already
//! materialized from the partial reply are kept, and the same applies to a
//! transport failure mid-stream.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use serde::Serialize;

use crate::api::{CancelToken, ChatClient};
use crate::cli::ChatArgs;
use crate::config::{effective_api_key, effective_api_url, effective_model};
use crate::debounce::Debouncer;
use crate::error::{Error, Result};
use crate::model::{now_ms, short_id, ChatMessage, ImageAttachment};
use crate::preview::{build_document, PREVIEW_DEBOUNCE_MS};
use crate::storage::{WorkspaceRecord, PERSIST_DEBOUNCE_MS};
use crate::stream::{display_text, ExtractSession};
use crate::workspace::FileSet;

use super::App;

#[derive(Serialize)]
struct ChatOutput<'a> {
    user_message_id: &'a str,
    reply: String,
    files_written: &'a [String],
    cancelled: bool,
    snapshot_taken: bool,
}

/// Execute the chat command.
///
/// # Errors
///
/// `MissingApiKey` without a configured key; `Transport` for stream
/// failures (after the partial results are persisted).
pub fn execute(args: &ChatArgs, home: Option<&Path>, json: bool, quiet: bool) -> Result<()> {
    let mut app = App::load(home)?;

    let settings = app.store.load_settings();
    let api_key = effective_api_key(settings.api_key.as_deref()).ok_or(Error::MissingApiKey)?;
    let api_url = effective_api_url(settings.api_url.as_deref());
    let model = args
        .model
        .clone()
        .unwrap_or_else(|| effective_model(settings.model.as_deref()));
    let client = ChatClient::new(&api_url, &api_key, &model)?;

    let images: Vec<ImageAttachment> = args
        .image
        .iter()
        .map(|url| ImageAttachment {
            id: short_id("img"),
            url: url.clone(),
            name: url.rsplit('/').next().unwrap_or("image").to_string(),
        })
        .collect();

    // Create-on-first-turn: a workspace not bound to a live project gets
    // one, so the turn's snapshot and sync have somewhere to land.
    if app.active_project_index().is_none() {
        let name = match app.workspace.project_name() {
            "" => "project1".to_string(),
            n => n.to_string(),
        };
        let project = crate::model::SavedProject::new(name, app.workspace.files().snapshot(), now_ms());
        app.workspace.attach_project(&project.id, &project.name);
        app.projects.push(project);
    }

    // The request context is frozen before the turn mutates the workspace.
    let files_before = FileSet::from_nodes(app.workspace.files().snapshot());
    let history: Vec<ChatMessage> = app.workspace.api_history().into_iter().cloned().collect();
    let history_refs: Vec<&ChatMessage> = history.iter().collect();
    let project_name = match app.workspace.project_name() {
        "" => "project".to_string(),
        name => name.to_string(),
    };

    let turn = app.workspace.begin_turn(&args.prompt, images.clone(), now_ms());

    let cancel = CancelToken::new();
    let mut session = ExtractSession::new();
    let mut written: Vec<String> = Vec::new();
    let mut persist_soon = Debouncer::new(Duration::from_millis(PERSIST_DEBOUNCE_MS));
    let mut preview_soon = Debouncer::new(Duration::from_millis(PREVIEW_DEBOUNCE_MS));

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("failed to start async runtime: {e}")))?;

    let stream_result = {
        let App { ref store, ref mut workspace, .. } = app;
        let sidebar_width = app.sidebar_width;

        let on_delta = |delta: &str| {
            let events = session.feed(delta);
            workspace.set_streaming_text(&turn.model_message_id, session.transcript());

            for event in &events {
                match workspace.apply_event(event, now_ms()) {
                    Ok(path) => {
                        if !json && !quiet {
                            println!("  {} {}", "wrote".green(), path);
                        }
                        written.push(path);
                        persist_soon.schedule();
                        if args.preview.is_some() {
                            preview_soon.schedule();
                        }
                    }
                    Err(e) => tracing::warn!("skipping file block: {e}"),
                }
            }

            if persist_soon.fire_if_due() {
                store.save_workspace(&WorkspaceRecord::capture(workspace, sidebar_width));
            }
            if preview_soon.fire_if_due() {
                if let Some(path) = &args.preview {
                    if let Err(e) = std::fs::write(path, build_document(workspace.files())) {
                        tracing::warn!("preview write failed: {e}");
                    }
                }
            }
        };

        runtime.block_on(async {
            tokio::select! {
                result = client.stream_chat(
                    &files_before,
                    &project_name,
                    &args.prompt,
                    &history_refs,
                    &images,
                    &cancel,
                    on_delta,
                ) => result,
                () = wait_for_interrupt() => {
                    cancel.cancel();
                    Ok(String::new())
                }
            }
        })
    };

    // Streaming or cancelled alike, the in-flight reply is finalized and
    // the state is written out before any error propagates.
    app.workspace.finish_turn(&turn.model_message_id);
    persist_soon.flush();
    preview_soon.flush();
    if let Some(path) = &args.preview {
        std::fs::write(path, build_document(app.workspace.files()))?;
    }
    app.persist()?;

    let transcript = session.transcript().to_string();
    stream_result?;

    let reply = display_text(&transcript);
    if json {
        let output = ChatOutput {
            user_message_id: &turn.user_message_id,
            reply,
            files_written: &written,
            cancelled: cancel.is_cancelled(),
            snapshot_taken: turn.snapshot_taken,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if !quiet {
        if !reply.is_empty() {
            println!("{reply}");
        }
        if cancel.is_cancelled() {
            println!("{}", "Generation stopped; partial files kept.".yellow());
        }
        if written.is_empty() {
            println!("{}", "No files were written this turn.".dimmed());
        } else {
            println!(
                "{} {} file(s): {}",
                "Updated".green().bold(),
                written.len(),
                written.join(", ")
            );
        }
    }

    Ok(())
}

async fn wait_for_interrupt() {
    // A failed signal hook means we simply cannot cancel interactively.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
