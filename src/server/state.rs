//! Application state shared across all request handlers.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::complaints::ComplaintHistory;
use crate::config::SafeguardConfig;
use crate::conversation::{ConversationEngine, KeywordClassifier, SessionId};
use crate::identity::{InMemoryProfileStore, ProfileStore, SessionContext};
use crate::lawyers::{LawyerLookup, RemoteDirectory};
use crate::queue::PriorityQueueClient;

/// One chat session: its conversation and its auth context.
pub struct ChatSession {
    /// Conversation log and turn engine.
    pub engine: ConversationEngine,
    /// Signed-in state injected into the session.
    pub context: SessionContext,
}

/// Session handle; the mutex serializes every mutation of one conversation.
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Shared application state.
pub struct AppState {
    /// Live chat sessions.
    pub sessions: DashMap<SessionId, SharedSession>,
    /// Keyword rules shared by every conversation.
    pub classifier: Arc<KeywordClassifier>,
    /// Lawyer lookup with fallback directory.
    pub lawyers: LawyerLookup,
    /// Complaint history per user.
    pub complaints: ComplaintHistory,
    /// Profile and SOS documents per user.
    pub profiles: Arc<dyn ProfileStore>,
    /// Priority-queue service client, when configured.
    pub queue: Option<PriorityQueueClient>,
    /// Configuration the state was built from.
    pub config: SafeguardConfig,
}

impl AppState {
    /// Create a new shared application state.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or a client cannot be built.
    pub fn new(config: SafeguardConfig) -> Result<Arc<Self>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Arc::new(Self::build(config)?))
    }

    /// Build the state without sharing it, so collaborators can be swapped first.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or a client cannot be built.
    pub fn build(config: SafeguardConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        config.validate()?;

        let classifier = Arc::new(
            KeywordClassifier::new().map_err(|e| format!("Failed to compile keyword rules: {e}"))?,
        );

        let lawyers = match &config.lawyer_api_url {
            Some(url) => {
                let remote = RemoteDirectory::new(url, config.lookup_timeout)
                    .map_err(|e| format!("Failed to create lawyer directory client: {e}"))?;
                tracing::info!("Lawyer directory: {url}");
                LawyerLookup::new(Arc::new(remote))
            }
            None => {
                tracing::info!("No lawyer directory configured, using fallback directory only");
                LawyerLookup::fallback_only()
            }
        }
        .with_timeout(config.lookup_timeout);

        let queue = config
            .queue_api_url
            .as_deref()
            .map(|url| PriorityQueueClient::new(url, config.lookup_timeout))
            .transpose()
            .map_err(|e| format!("Failed to create queue client: {e}"))?;

        Ok(Self {
            sessions: DashMap::new(),
            classifier,
            lawyers,
            complaints: ComplaintHistory::with_demo_records(),
            profiles: Arc::new(InMemoryProfileStore::new()),
            queue,
            config,
        })
    }

    /// Replace the profile document store.
    #[must_use]
    pub fn with_profiles(mut self, profiles: Arc<dyn ProfileStore>) -> Self {
        self.profiles = profiles;
        self
    }

    /// Replace the lawyer lookup.
    #[must_use]
    pub fn with_lawyers(mut self, lawyers: LawyerLookup) -> Self {
        self.lawyers = lawyers;
        self
    }

    /// Open a new chat session.
    pub fn create_session(&self) -> (SessionId, SharedSession) {
        let id = SessionId::new();
        let session = Arc::new(Mutex::new(ChatSession {
            engine: ConversationEngine::new(Arc::clone(&self.classifier)),
            context: SessionContext::new(),
        }));
        self.sessions.insert(id, Arc::clone(&session));
        tracing::info!(session = %id, "opened chat session");
        (id, session)
    }

    /// Close a session, dropping its conversation and auth context.
    ///
    /// Listeners on the context see it end once no pending lookup holds the
    /// session any more. Returns whether the session existed.
    pub fn close_session(&self, id: SessionId) -> bool {
        let closed = self.sessions.remove(&id).is_some();
        if closed {
            tracing::info!(session = %id, "closed chat session");
        }
        closed
    }

    /// Look up a live session.
    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<SharedSession> {
        self.sessions.get(&id).map(|entry| Arc::clone(entry.value()))
    }
}
