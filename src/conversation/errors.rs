//! Error types for the conversation engine.

use thiserror::Error;

use crate::conversation::ids::MessageId;

/// Conversation engine error type.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// An external lookup is still pending; the log cannot change until it resolves.
    #[error("conversation is busy waiting for a lookup to complete")]
    Busy,
    /// A pending turn was completed with a token that is no longer current.
    #[error("no pending turn for user message {0}")]
    StalePending(MessageId),
    /// A keyword pattern failed to compile.
    #[error("invalid keyword pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Convenience result alias for conversation operations.
pub type ConversationResult<T> = Result<T, ConversationError>;
