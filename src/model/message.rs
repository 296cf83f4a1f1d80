//! Chat transcript model.

use serde::{Deserialize, Serialize};

/// Fixed id of the canned welcome turn shown in a fresh transcript.
///
/// Excluded from the history sent to the model and never snapshotted.
pub const WELCOME_MESSAGE_ID: &str = "welcome";

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// An image attached to a user turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub id: String,
    /// Data URL or remote URL passed through to the API.
    pub url: String,
    pub name: String,
}

/// One turn in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,

    pub role: Role,

    /// Raw text; may contain embedded file-block markup while streaming.
    pub text: String,

    /// Unix milliseconds.
    pub timestamp: i64,

    /// True only for the in-flight model reply.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_streaming: bool,

    /// Attachments shown alongside a user turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageAttachment>,
}

impl ChatMessage {
    /// Create a user turn.
    #[must_use]
    pub fn user(text: impl Into<String>, images: Vec<ImageAttachment>, now: i64) -> Self {
        Self {
            id: super::short_id("msg"),
            role: Role::User,
            text: text.into(),
            timestamp: now,
            is_streaming: false,
            images,
        }
    }

    /// Create an in-flight model turn with empty text.
    #[must_use]
    pub fn streaming_model(now: i64) -> Self {
        Self {
            id: super::short_id("msg"),
            role: Role::Model,
            text: String::new(),
            timestamp: now,
            is_streaming: true,
            images: Vec::new(),
        }
    }

    /// The canned greeting that opens every fresh transcript.
    #[must_use]
    pub fn welcome(now: i64) -> Self {
        Self {
            id: WELCOME_MESSAGE_ID.to_string(),
            role: Role::Model,
            text: "Hello! I'm ready to help you build something amazing. \
                   What would you like to create?"
                .to_string(),
            timestamp: now,
            is_streaming: false,
            images: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = ChatMessage::user("build a todo app", Vec::new(), 42);
        assert_eq!(msg.role, Role::User);
        assert!(msg.id.starts_with("msg_"));
        assert!(!msg.is_streaming);
    }

    #[test]
    fn test_streaming_model_message() {
        let msg = ChatMessage::streaming_model(42);
        assert_eq!(msg.role, Role::Model);
        assert!(msg.is_streaming);
        assert!(msg.text.is_empty());
    }

    #[test]
    fn test_welcome_id_is_fixed() {
        assert_eq!(ChatMessage::welcome(0).id, WELCOME_MESSAGE_ID);
    }
}
