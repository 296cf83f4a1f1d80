//! Streamed-file extraction session.
//!
//! One [`ExtractSession`] lives for the duration of a single model reply.
//! Chunks are appended to one growing buffer (never a window: an end marker
//! may arrive arbitrarily many chunks after its start marker), and the whole
//! buffer is re-scanned after every append. Each distinct declared path is
//! emitted at most once per session, as soon as its block is complete.
//!
//! The full re-scan trades CPU for simplicity; buffers are bounded by a
//! single conversational turn.

use std::collections::HashSet;

use super::blocks;

/// A "file materialized" event emitted by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// The declared destination path from the start marker.
    pub declared_path: String,

    /// Raw block content (trimming happens at materialization).
    pub content: String,

    /// True for the most-recently-completed block of this scan; the
    /// receiver switches the active file to it.
    pub is_latest: bool,
}

/// Accumulating extractor for one streaming model reply.
#[derive(Debug, Default)]
pub struct ExtractSession {
    buffer: String,
    emitted: HashSet<String>,
}

impl ExtractSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw accumulated reply, for transcript rendering.
    ///
    /// Always complete regardless of block state: partial blocks stay
    /// visible here even though they are never materialized.
    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.buffer
    }

    /// Declared paths already materialized this session.
    #[must_use]
    pub fn emitted(&self) -> &HashSet<String> {
        &self.emitted
    }

    /// Append one chunk and return the materialize events it unlocked.
    ///
    /// Events appear in buffer order; a path already emitted this session
    /// is never emitted again, even though its content is re-scanned on
    /// every chunk. The last new event carries `is_latest`.
    pub fn feed(&mut self, chunk: &str) -> Vec<FileEvent> {
        self.buffer.push_str(chunk);

        let mut events: Vec<FileEvent> = blocks::scan(&self.buffer)
            .into_iter()
            .filter(|b| !self.emitted.contains(b.declared_path))
            .map(|b| FileEvent {
                declared_path: b.declared_path.to_string(),
                content: b.content.to_string(),
                is_latest: false,
            })
            .collect();

        for event in &mut events {
            self.emitted.insert(event.declared_path.clone());
        }
        if let Some(last) = events.last_mut() {
            last.is_latest = true;
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_split_across_chunks() {
        let mut session = ExtractSession::new();
        assert!(session.feed("Here you go: <file name=\"app/index.ht").is_empty());
        assert!(session.feed("ml\">\n<h1>Hi</h1>\n</fi").is_empty());

        let events = session.feed("le> done");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].declared_path, "app/index.html");
        assert_eq!(events[0].content.trim(), "<h1>Hi</h1>");
        assert!(events[0].is_latest);
    }

    #[test]
    fn test_exactly_once_per_path() {
        let mut session = ExtractSession::new();
        let events = session.feed("<file name=\"a.js\">1</file>");
        assert_eq!(events.len(), 1);

        // Subsequent chunks re-scan the same complete block; no re-emission.
        assert!(session.feed(" trailing prose").is_empty());
        assert!(session.feed(" more").is_empty());
        assert_eq!(session.emitted().len(), 1);
    }

    #[test]
    fn test_two_chunk_scenario_end_to_end() {
        let mut session = ExtractSession::new();

        // Chunk 1 completes index.html and opens app.js mid-block.
        let events = session.feed(
            "<file name='app/index.html'><h1>ok</h1></file><file name='app/app.js'>conso",
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].declared_path, "app/index.html");
        assert!(events[0].is_latest);

        // Chunk 2 completes app.js; index.html is not re-emitted.
        let events = session.feed("le.log('x');</file>");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].declared_path, "app/app.js");
        assert!(events[0].is_latest);
    }

    #[test]
    fn test_multiple_completions_in_one_scan() {
        let mut session = ExtractSession::new();
        let events = session.feed(
            "<file name=\"a.js\">1</file><file name=\"b.js\">2</file><file name=\"c.js\">3</file>",
        );
        assert_eq!(events.len(), 3);
        assert!(!events[0].is_latest);
        assert!(!events[1].is_latest);
        assert!(events[2].is_latest, "last completed block wins");
    }

    #[test]
    fn test_unterminated_block_never_emitted() {
        let mut session = ExtractSession::new();
        session.feed("<file name=\"a.js\">never finished");
        // Stream ends here; nothing was emitted but the raw text is visible.
        assert!(session.emitted().is_empty());
        assert!(session.transcript().contains("never finished"));
    }

    #[test]
    fn test_transcript_accumulates_everything() {
        let mut session = ExtractSession::new();
        session.feed("Sure! ");
        session.feed("<file name=\"a.js\">x</file>");
        assert_eq!(session.transcript(), "Sure! <file name=\"a.js\">x</file>");
    }
}
