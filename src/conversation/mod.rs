//! Conversation log and turn engine.
//!
//! - `ids`: message and session identifiers
//! - `message`: roles and immutable messages
//! - `classifier`: ordered keyword rules producing canned replies
//! - `engine`: the log, its mutations, and the single-flight external turn

pub mod classifier;
pub mod engine;
pub mod errors;
pub mod ids;
pub mod message;

pub use classifier::{Classification, Intent, KeywordClassifier};
pub use engine::{ConversationEngine, ExternalReply, PendingTurn};
pub use errors::{ConversationError, ConversationResult};
pub use ids::{MessageId, SessionId};
pub use message::{Message, Role, WELCOME_TEXT};
