//! Chat types shared by every provider.
//!
//! A conversation is an ordered `Vec<Message>`. Providers only read it and
//! always answer with a [`Reply`], whether the answer came from a real backend
//! or from the simulator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────

/// Author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

// ─────────────────────────────────────────────
// Message
// ─────────────────────────────────────────────

/// One turn of a conversation.
///
/// `timestamp` is local bookkeeping only and never reaches a provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Stamp the message with the current time.
    pub fn stamped(mut self) -> Self {
        self.timestamp = Some(Utc::now());
        self
    }
}

/// Find the most recent user message, scanning from the end.
pub fn last_user_message(messages: &[Message]) -> Option<&Message> {
    messages.iter().rev().find(|m| m.role == Role::User)
}

// ─────────────────────────────────────────────
// Reply
// ─────────────────────────────────────────────

/// The assistant answer produced by a provider or by the fallback path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub role: Role,
    pub content: String,
}

impl Reply {
    /// Create an assistant reply.
    pub fn assistant(content: impl Into<String>) -> Self {
        Reply {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Convert into a message so it can be appended to a conversation.
    pub fn into_message(self) -> Message {
        Message::new(self.role, self.content)
    }
}

impl From<Reply> for Message {
    fn from(reply: Reply) -> Self {
        reply.into_message()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
