//! OpenAI-compatible chat client.
//!
//! Streams `/chat/completions` responses as server-sent `data:` lines,
//! surfacing raw text deltas to the caller as they arrive. Cancellation is
//! cooperative via a [`CancelToken`] checked between reads; whatever was
//! received before the cancel stays with the caller.
//!
//! # Submodules
//!
//! - [`prompt`] - system instruction and request-payload assembly

pub mod prompt;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{ChatMessage, ImageAttachment};
use crate::workspace::FileSet;

/// Cooperative stop-generation flag, shared between the stream loop and
/// whatever signals the stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

// ── Wire types ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    stream: bool,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: WireContent,
}

/// Plain text for history turns, typed parts for multimodal user turns.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

// ── Client ────────────────────────────────────────────────────

/// Chat client bound to one endpoint, key, and model.
#[derive(Debug)]
pub struct ChatClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// `MissingApiKey` for an empty key.
    pub fn new(api_url: &str, api_key: &str, model: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Stream one chat turn, invoking `on_delta` for each text fragment as
    /// it arrives. Returns the full accumulated reply.
    ///
    /// A cancelled token stops the read loop cleanly; the partial reply is
    /// still returned so already-completed file blocks survive.
    ///
    /// # Errors
    ///
    /// `Transport` for connection failures, non-success statuses, and body
    /// read errors.
    pub async fn stream_chat(
        &self,
        files: &FileSet,
        project_name: &str,
        user_prompt: &str,
        history: &[&ChatMessage],
        images: &[ImageAttachment],
        cancel: &CancelToken,
        mut on_delta: impl FnMut(&str),
    ) -> Result<String> {
        let request = self.build_request(files, project_name, user_prompt, history, images);
        let url = format!("{}/chat/completions", self.api_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "API request failed: {status} {body}"
            )));
        }

        let mut stream = response.bytes_stream();
        let mut line_buffer = String::new();
        let mut reply = String::new();

        while let Some(chunk) = stream.next().await {
            if cancel.is_cancelled() {
                break;
            }
            let bytes = chunk.map_err(|e| Error::Transport(format!("stream read failed: {e}")))?;
            line_buffer.push_str(&String::from_utf8_lossy(&bytes));

            // Complete lines only; the tail stays buffered until its
            // newline arrives in a later chunk.
            while let Some(newline_at) = line_buffer.find('\n') {
                let line: String = line_buffer.drain(..=newline_at).collect();
                match parse_sse_line(line.trim_end()) {
                    SseEvent::Delta(text) => {
                        reply.push_str(&text);
                        on_delta(&text);
                    }
                    SseEvent::Done => return Ok(reply),
                    SseEvent::Skip => {}
                }
            }
        }

        // A final data line without a trailing newline still counts.
        if let SseEvent::Delta(text) = parse_sse_line(line_buffer.trim_end()) {
            reply.push_str(&text);
            on_delta(&text);
        }

        Ok(reply)
    }

    fn build_request(
        &self,
        files: &FileSet,
        project_name: &str,
        user_prompt: &str,
        history: &[&ChatMessage],
        images: &[ImageAttachment],
    ) -> ChatRequest<'_> {
        let mut messages = vec![WireMessage {
            role: "system",
            content: WireContent::Text(prompt::system_instruction(project_name)),
        }];

        for turn in history {
            messages.push(WireMessage {
                role: prompt::wire_role(turn),
                content: WireContent::Text(turn.text.clone()),
            });
        }

        let text = prompt::user_text(files, user_prompt);
        let content = if images.is_empty() {
            WireContent::Text(text)
        } else {
            let mut parts = vec![ContentPart::Text { text }];
            parts.extend(images.iter().map(|image| ContentPart::ImageUrl {
                image_url: ImageUrl { url: image.url.clone(), detail: "high" },
            }));
            WireContent::Parts(parts)
        };
        messages.push(WireMessage { role: "user", content });

        ChatRequest {
            model: &self.model,
            messages,
            stream: true,
            temperature: 0.7,
            max_tokens: 32_000,
        }
    }
}

enum SseEvent {
    Delta(String),
    Done,
    Skip,
}

/// Parse one server-sent line. Unparseable data lines are skipped, never
/// fatal: providers interleave keep-alives and metadata freely.
fn parse_sse_line(line: &str) -> SseEvent {
    let Some(data) = line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:")) else {
        return SseEvent::Skip;
    };
    let data = data.trim();
    if data == "[DONE]" {
        return SseEvent::Done;
    }
    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.delta.content)
            .filter(|t| !t.is_empty())
            .map_or(SseEvent::Skip, SseEvent::Delta),
        Err(_) => SseEvent::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delta_line() {
        let line = r#"data: {"choices":[{"delta":{"content":"<file "}}]}"#;
        match parse_sse_line(line) {
            SseEvent::Delta(text) => assert_eq!(text, "<file "),
            _ => panic!("expected a delta"),
        }
    }

    #[test]
    fn test_parse_done_and_noise() {
        assert!(matches!(parse_sse_line("data: [DONE]"), SseEvent::Done));
        assert!(matches!(parse_sse_line(""), SseEvent::Skip));
        assert!(matches!(parse_sse_line(": keep-alive"), SseEvent::Skip));
        assert!(matches!(parse_sse_line("data: {not json"), SseEvent::Skip));
        assert!(matches!(
            parse_sse_line(r#"data: {"choices":[{"delta":{}}]}"#),
            SseEvent::Skip
        ));
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = ChatClient::new("http://localhost", "  ", "m").unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_request_payload_shape() {
        let client = ChatClient::new("http://localhost/v1/", "sk-x", "test-model").unwrap();
        let mut files = FileSet::new();
        files.upsert_declared("app/index.html", "<html>", 1).unwrap();

        let request = client.build_request(&files, "app", "add a button", &[], &[]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "system");
        let last = json["messages"].as_array().unwrap().last().unwrap().clone();
        assert_eq!(last["role"], "user");
        assert!(last["content"].as_str().unwrap().contains("add a button"));
    }

    #[test]
    fn test_image_turn_uses_typed_parts() {
        let client = ChatClient::new("http://localhost", "sk-x", "m").unwrap();
        let files = FileSet::new();
        let images = vec![ImageAttachment {
            id: "img_1".to_string(),
            url: "data:image/png;base64,AAAA".to_string(),
            name: "mock.png".to_string(),
        }];

        let request = client.build_request(&files, "app", "match this design", &[], &images);
        let json = serde_json::to_value(&request).unwrap();
        let content = &json["messages"].as_array().unwrap().last().unwrap()["content"];
        assert!(content.is_array());
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(content[1]["image_url"]["detail"], "high");
    }
}
