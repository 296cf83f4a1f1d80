//! Error types for Code Studio.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=storage, 3=not_found, 4=validation, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use thiserror::Error;

/// Result type alias for Code Studio operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Storage (exit 2)
    StorageError,

    // Not Found (exit 3)
    ProjectNotFound,
    FileNotFound,
    SnapshotNotFound,

    // Validation (exit 4)
    LastFileProtected,
    RequiredField,
    InvalidPath,
    InvalidArgument,

    // Transport (exit 6)
    TransportError,

    // Config (exit 7)
    MissingApiKey,
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::StorageError => "STORAGE_ERROR",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::SnapshotNotFound => "SNAPSHOT_NOT_FOUND",
            Self::LastFileProtected => "LAST_FILE_PROTECTED",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::InvalidPath => "INVALID_PATH",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::TransportError => "TRANSPORT_ERROR",
            Self::MissingApiKey => "MISSING_API_KEY",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::StorageError => 2,
            Self::ProjectNotFound | Self::FileNotFound | Self::SnapshotNotFound => 3,
            Self::LastFileProtected
            | Self::RequiredField
            | Self::InvalidPath
            | Self::InvalidArgument => 4,
            Self::TransportError => 6,
            Self::MissingApiKey | Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in Code Studio operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Version snapshot not found for message: {message_id}")]
    SnapshotNotFound { message_id: String },

    #[error("Cannot delete the last remaining file")]
    LastFileProtected,

    #[error("{field} must not be empty")]
    RequiredField { field: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::ProjectNotFound { .. } => ErrorCode::ProjectNotFound,
            Self::FileNotFound { .. } => ErrorCode::FileNotFound,
            Self::SnapshotNotFound { .. } => ErrorCode::SnapshotNotFound,
            Self::LastFileProtected => ErrorCode::LastFileProtected,
            Self::RequiredField { .. } => ErrorCode::RequiredField,
            Self::InvalidPath(_) => ErrorCode::InvalidPath,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::MissingApiKey => ErrorCode::MissingApiKey,
            Self::Transport(_) => ErrorCode::TransportError,
            Self::Storage(_) => ErrorCode::StorageError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for humans and scripts.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingApiKey => Some(
                "Set a key with `studio config set-key <KEY>` or the STUDIO_API_KEY env var"
                    .to_string(),
            ),

            Self::ProjectNotFound { id } => Some(format!(
                "No project with ID '{id}'. Use `studio project list` to see available projects."
            )),

            Self::FileNotFound { path } => Some(format!(
                "No file at '{path}'. Use `studio file list` to see the current file tree."
            )),

            Self::SnapshotNotFound { message_id } => Some(format!(
                "No version keyed by message '{message_id}'. Use `studio history list`."
            )),

            Self::LastFileProtected => {
                Some("A project must keep at least one file.".to_string())
            }

            Self::RequiredField { field } => Some(format!("Provide a non-empty {field}.")),

            Self::Transport(_) => Some(
                "Check your network, API URL and key. Files already materialized \
                 from the partial response are kept."
                    .to_string(),
            ),

            Self::InvalidPath(_)
            | Self::InvalidArgument(_)
            | Self::Storage(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::LastFileProtected.exit_code(), 4);
        assert_eq!(
            Error::ProjectNotFound { id: "proj_x".into() }.exit_code(),
            3
        );
        assert_eq!(Error::MissingApiKey.exit_code(), 7);
        assert_eq!(Error::Transport("boom".into()).exit_code(), 6);
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let err = Error::MissingApiKey;
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "MISSING_API_KEY");
        assert!(json["error"]["hint"].as_str().unwrap().contains("set-key"));
    }

    #[test]
    fn test_last_file_protected_message() {
        let err = Error::LastFileProtected;
        assert!(err.to_string().contains("last remaining file"));
        assert_eq!(err.error_code().as_str(), "LAST_FILE_PROTECTED");
    }
}
