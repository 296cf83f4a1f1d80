//! Complete file-block detection.
//!
//! A model response embeds files as `<file name="path">content</file>`.
//! This module finds every *complete* block (both markers present) in an
//! accumulated buffer. Blocks whose end marker has not arrived yet are
//! simply not reported; that is "not yet complete", never an error.

/// A complete file block found in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock<'a> {
    /// The slash-delimited destination path declared in the start marker.
    pub declared_path: &'a str,

    /// Literal content between the markers, untrimmed.
    pub content: &'a str,
}

const OPEN: &str = "<file";
const CLOSE: &str = "</file>";

/// Scan the whole buffer for complete file blocks, in order of appearance.
///
/// Matching mirrors the lazy `<file\s+name=["']([^"']+)["']>...</file>`
/// contract: content runs to the *next* end marker, and scanning resumes
/// after it. A start marker with no end marker terminates the scan; nothing
/// after it can be complete yet.
#[must_use]
pub fn scan(buffer: &str) -> Vec<FileBlock<'_>> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(rel) = buffer[pos..].find(OPEN) {
        let open_at = pos + rel;
        match parse_start_marker(&buffer[open_at..]) {
            Some((path, content_offset)) => {
                let content_start = open_at + content_offset;
                let Some(close_rel) = buffer[content_start..].find(CLOSE) else {
                    break; // open block still streaming
                };
                let content_end = content_start + close_rel;
                blocks.push(FileBlock {
                    declared_path: path,
                    content: &buffer[content_start..content_end],
                });
                pos = content_end + CLOSE.len();
            }
            // Not a well-formed start marker at this position; if the tag
            // itself may still be arriving, wait for more input.
            None => {
                if buffer[open_at..].contains('>') {
                    pos = open_at + OPEN.len();
                } else {
                    break;
                }
            }
        }
    }

    blocks
}

/// Strip file blocks from a transcript, leaving the surrounding prose.
///
/// Complete blocks are removed whole; a trailing open block is removed from
/// its start marker onward, so a streaming reply never shows half a file.
#[must_use]
pub fn display_text(buffer: &str) -> String {
    let mut prose = String::new();
    let mut pos = 0;

    while let Some(rel) = buffer[pos..].find(OPEN) {
        let open_at = pos + rel;
        match parse_start_marker(&buffer[open_at..]) {
            Some((_, content_offset)) => {
                prose.push_str(&buffer[pos..open_at]);
                let content_start = open_at + content_offset;
                match buffer[content_start..].find(CLOSE) {
                    Some(close_rel) => pos = content_start + close_rel + CLOSE.len(),
                    None => return prose.trim().to_string(),
                }
            }
            None => {
                if buffer[open_at..].contains('>') {
                    prose.push_str(&buffer[pos..open_at + OPEN.len()]);
                    pos = open_at + OPEN.len();
                } else {
                    prose.push_str(&buffer[pos..open_at]);
                    return prose.trim().to_string();
                }
            }
        }
    }

    prose.push_str(&buffer[pos..]);
    prose.trim().to_string()
}

/// Parse `<file name="path">` (either quote style) at the start of `s`.
///
/// Returns the declared path and the byte offset where content begins.
fn parse_start_marker(s: &str) -> Option<(&str, usize)> {
    let mut rest = s.strip_prefix(OPEN)?;

    // At least one whitespace char between `<file` and `name=`.
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        return None;
    }
    rest = trimmed.strip_prefix("name=")?;

    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    rest = &rest[1..];
    let path_len = rest.find(quote)?;
    let path = &rest[..path_len];
    if path.is_empty() {
        return None;
    }

    rest = &rest[path_len + 1..];
    rest = rest.strip_prefix('>')?;

    let content_offset = s.len() - rest.len();
    Some((path, content_offset))
}
