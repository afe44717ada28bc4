//! Conversation data model.

use serde::{Deserialize, Serialize};

/// Role of a transcript message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// A single message in the transcript.
///
/// User messages are immutable once appended. The bot message of the active
/// submission grows in place as frames arrive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
        }
    }
}

/// Payload of one non-terminator frame: `{"text": "..."}`.
///
/// One frame carries one incremental segment of the answer. Unknown fields
/// are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenFrame {
    pub text: String,
}
