//! Message model for the conversation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::conversation::ids::MessageId;

/// Text of the sentinel welcome message that opens every conversation.
pub const WELCOME_TEXT: &str =
    "Hello, I'm SafeGuard, your AI legal assistant. How can I help you today?";

/// Author of a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Text typed or composed on behalf of the user.
    User,
    /// Reply produced by the assistant.
    Assistant,
}

impl Role {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(value.to_string()),
        }
    }
}

/// One entry in a conversation log.
///
/// Fields are private so content cannot change after creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Build a user message stamped now.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Build an assistant message stamped now.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Build a fresh welcome message.
    #[must_use]
    pub fn welcome() -> Self {
        Self::assistant(WELCOME_TEXT)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Message author.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Message body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Creation time.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert!("system".parse::<Role>().is_err());
    }

    #[test]
    fn test_welcome_is_assistant() {
        let first = Message::welcome();
        let second = Message::welcome();
        assert_eq!(first.role(), Role::Assistant);
        assert_eq!(first.content(), WELCOME_TEXT);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_serialized_shape() {
        let message = Message::user("hi");
        let value = serde_json::to_value(&message).unwrap_or_default();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"], "hi");
        assert!(value["id"].is_string());
        assert!(value["timestamp"].is_string());
    }
}
