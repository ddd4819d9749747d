//! Identity documents and the per-session auth context.
//!
//! Authentication itself lives in an external identity backend. This module
//! only models what the assistant consumes from it: an opaque user id, the
//! profile and SOS-contact documents stored per user, and the signed-in state
//! of a chat session.

pub mod session;
pub mod store;

pub use session::{AuthState, SessionContext, SessionSubscription};
pub use store::{InMemoryProfileStore, ProfileError, ProfileFuture, ProfileResult, ProfileStore};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque user identifier issued by the identity backend.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Basic profile document.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: String,
}

/// Emergency contacts document.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosContacts {
    /// First contact name.
    pub contact1_name: String,
    /// First contact phone.
    pub contact1_phone: String,
    /// Second contact name.
    pub contact2_name: String,
    /// Second contact phone.
    pub contact2_phone: String,
    /// Message sent to both contacts.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sos_contacts_field_names() {
        let contacts = SosContacts {
            contact1_name: "A".to_string(),
            message: "m".to_string(),
            ..SosContacts::default()
        };
        let value = serde_json::to_value(&contacts).unwrap_or_default();
        assert_eq!(value["contact1Name"], "A");
        assert_eq!(value["contact2Phone"], "");
        assert_eq!(value["message"], "m");
    }

    #[test]
    fn test_user_id_is_transparent() {
        let id = UserId::new("user123");
        assert_eq!(serde_json::to_string(&id).unwrap_or_default(), "\"user123\"");
        assert_eq!(id.to_string(), "user123");
    }
}
