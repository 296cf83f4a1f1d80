//! Data models for Code Studio.
//!
//! This module contains all domain models:
//! - `ProjectFile` (file/folder nodes)
//! - `ChatMessage` (conversation turns)
//! - `SavedProject` / `VersionSnapshot` (persisted units of work)

pub mod file;
pub mod message;
pub mod project;

pub use file::{FileKind, Language, ProjectFile};
pub use message::{ChatMessage, ImageAttachment, Role, WELCOME_MESSAGE_ID};
pub use project::{initial_files, ProjectHistory, SavedProject, VersionSnapshot};

/// Current time as Unix milliseconds.
#[must_use]
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a prefixed short id, e.g. `proj_1a2b3c4d5e6f`.
#[must_use]
pub fn short_id(prefix: &str) -> String {
    format!("{prefix}_{}", &uuid::Uuid::new_v4().simple().to_string()[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_shape() {
        let id = short_id("proj");
        assert!(id.starts_with("proj_"));
        assert_eq!(id.len(), "proj_".len() + 12);
    }
}
