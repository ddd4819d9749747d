//! Conversation engine: the ordered message log and its mutations.
//!
//! A turn moves `Idle -> UserAppended -> AssistantAppended -> Idle`. Classified
//! turns do this inside a single `&mut self` call. External turns that need an
//! asynchronous lookup are split in two: [`ConversationEngine::begin_external`]
//! appends the user message and marks the engine busy, and
//! [`ConversationEngine::complete_external`] appends the reply. Every mutation
//! is refused while a turn is pending so undo always sees whole turns.

use std::sync::Arc;

use tracing::debug;

use crate::conversation::classifier::{Intent, KeywordClassifier};
use crate::conversation::errors::{ConversationError, ConversationResult};
use crate::conversation::ids::MessageId;
use crate::conversation::message::{Message, Role};
use crate::lawyers::{LawyerLookup, LawyerQuery};

/// Assistant side of an externally injected turn.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExternalReply {
    /// Reply already composed by the caller.
    Ready(String),
    /// Reply produced by a lawyer lookup.
    LawyerLookup(LawyerQuery),
}

/// Token for an external turn whose assistant reply is still outstanding.
#[derive(Debug, Eq, PartialEq)]
#[must_use = "a pending turn keeps the conversation busy until completed"]
pub struct PendingTurn {
    user_message: MessageId,
}

impl PendingTurn {
    /// Id of the user message that opened the turn.
    #[must_use]
    pub const fn user_message(&self) -> MessageId {
        self.user_message
    }
}

/// Owner of one conversation log.
pub struct ConversationEngine {
    log: Vec<Message>,
    classifier: Arc<KeywordClassifier>,
    pending: Option<MessageId>,
}

impl ConversationEngine {
    /// Start a conversation with the welcome message, sharing `classifier`.
    #[must_use]
    pub fn new(classifier: Arc<KeywordClassifier>) -> Self {
        Self {
            log: vec![Message::welcome()],
            classifier,
            pending: None,
        }
    }

    /// Start a conversation with a freshly built classifier.
    ///
    /// # Errors
    /// Returns an error if the keyword patterns fail to compile.
    pub fn with_default_rules() -> ConversationResult<Self> {
        Ok(Self::new(Arc::new(KeywordClassifier::new()?)))
    }

    /// Messages in insertion order. Never empty.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    /// Number of messages in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Always false; the welcome message is the floor of the log.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Whether an external lookup is pending.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    fn ensure_idle(&self) -> ConversationResult<()> {
        if self.is_busy() {
            return Err(ConversationError::Busy);
        }
        Ok(())
    }

    /// Append the user's text and the classified reply.
    ///
    /// Blank input is ignored and yields `Ok(None)`; otherwise the intent that
    /// produced the reply is returned.
    ///
    /// # Errors
    /// Returns [`ConversationError::Busy`] while an external turn is pending.
    pub fn submit_user_text(&mut self, text: &str) -> ConversationResult<Option<Intent>> {
        self.ensure_idle()?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        let classification = self.classifier.classify(text);
        self.log.push(Message::user(text));
        self.log.push(Message::assistant(classification.reply));
        debug!(len = self.log.len(), "appended classified turn");

        Ok(Some(classification.intent))
    }

    /// Remove the last turn.
    ///
    /// A trailing assistant reply preceded by a user message is removed as a
    /// pair; anything else removes only the last message. The welcome floor is
    /// never removed. Returns the removed messages, oldest first.
    ///
    /// # Errors
    /// Returns [`ConversationError::Busy`] while an external turn is pending.
    pub fn undo_last(&mut self) -> ConversationResult<Vec<Message>> {
        self.ensure_idle()?;
        let n = self.log.len();
        if n <= 1 {
            return Ok(Vec::new());
        }

        let paired = self.log[n - 1].role() == Role::Assistant && self.log[n - 2].role() == Role::User;
        let keep = if paired { n - 2 } else { n - 1 };
        let removed = self.log.split_off(keep);
        self.restore_floor();
        debug!(removed = removed.len(), "undid last turn");

        Ok(removed)
    }

    /// Delete the message with `id`. Unknown ids are a no-op.
    ///
    /// # Errors
    /// Returns [`ConversationError::Busy`] while an external turn is pending.
    pub fn delete_by_id(&mut self, id: MessageId) -> ConversationResult<Option<Message>> {
        self.ensure_idle()?;
        let Some(position) = self.log.iter().position(|m| m.id() == id) else {
            return Ok(None);
        };

        let removed = self.log.remove(position);
        self.restore_floor();
        debug!(%id, "deleted message");

        Ok(Some(removed))
    }

    /// Reset the log to a single fresh welcome message.
    ///
    /// # Errors
    /// Returns [`ConversationError::Busy`] while an external turn is pending.
    pub fn clear(&mut self) -> ConversationResult<()> {
        self.ensure_idle()?;
        self.log = vec![Message::welcome()];
        debug!("cleared conversation");
        Ok(())
    }

    /// Append a user message on behalf of a feature and mark the engine busy
    /// until [`Self::complete_external`] supplies the reply.
    ///
    /// # Errors
    /// Returns [`ConversationError::Busy`] while another external turn is pending.
    pub fn begin_external(&mut self, user_content: impl Into<String>) -> ConversationResult<PendingTurn> {
        self.ensure_idle()?;
        let message = Message::user(user_content);
        let user_message = message.id();
        self.log.push(message);
        self.pending = Some(user_message);
        debug!(%user_message, "external turn pending");

        Ok(PendingTurn { user_message })
    }

    /// Append the assistant reply of a pending external turn and go idle.
    ///
    /// # Errors
    /// Returns [`ConversationError::StalePending`] if `pending` is not the
    /// turn currently awaited.
    pub fn complete_external(
        &mut self,
        pending: PendingTurn,
        assistant_content: impl Into<String>,
    ) -> ConversationResult<&Message> {
        if self.pending != Some(pending.user_message) {
            return Err(ConversationError::StalePending(pending.user_message));
        }

        self.log.push(Message::assistant(assistant_content));
        self.pending = None;
        debug!(user_message = %pending.user_message, "external turn completed");

        Ok(&self.log[self.log.len() - 1])
    }

    /// Append an externally composed turn, resolving a lawyer lookup first when
    /// the reply needs one. Lookup failures degrade to the fallback directory.
    ///
    /// # Errors
    /// Returns [`ConversationError::Busy`] while another external turn is pending.
    pub async fn append_external_pair(
        &mut self,
        user_content: impl Into<String>,
        reply: ExternalReply,
        lookup: &LawyerLookup,
    ) -> ConversationResult<&Message> {
        let pending = self.begin_external(user_content)?;
        let content = match reply {
            ExternalReply::Ready(content) => content,
            ExternalReply::LawyerLookup(query) => lookup.resolve(&query).await.reply(&query),
        };
        self.complete_external(pending, content)
    }

    // Deleting by id may remove the welcome message; the log is never left empty.
    fn restore_floor(&mut self) {
        if self.log.is_empty() {
            self.log.push(Message::welcome());
        }
    }
}
