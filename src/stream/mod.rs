//! Stream extraction engine.
//!
//! Turns the model's incrementally-growing reply into discrete "file
//! materialized" events:
//! - [`blocks`] - complete file-block detection over an accumulated buffer
//! - [`session`] - per-reply session with exactly-once emission

pub mod blocks;
pub mod session;

pub use blocks::{display_text, FileBlock};
pub use session::{ExtractSession, FileEvent};
