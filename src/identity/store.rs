//! Per-user document storage contract.

use std::future::Future;
use std::pin::Pin;

use dashmap::DashMap;
use thiserror::Error;

use crate::identity::{Profile, SosContacts, UserId};

/// Boxed future type for profile store operations.
pub type ProfileFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Profile store error type.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The document backend rejected or failed the request.
    #[error("profile backend error: {0}")]
    Backend(String),
    /// A document failed validation.
    #[error("invalid profile document: {0}")]
    Invalid(String),
}

/// Convenience result alias for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Per-user documents held by the identity backend.
pub trait ProfileStore: Send + Sync {
    /// Load a user's profile. Missing documents are `Ok(None)`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached.
    fn profile<'a>(&'a self, user: &'a UserId) -> ProfileFuture<'a, ProfileResult<Option<Profile>>>;

    /// Save a user's profile, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the write.
    fn save_profile<'a>(&'a self, user: &'a UserId, profile: Profile) -> ProfileFuture<'a, ProfileResult<()>>;

    /// Load a user's SOS contacts. Missing documents are `Ok(None)`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached.
    fn sos_contacts<'a>(&'a self, user: &'a UserId) -> ProfileFuture<'a, ProfileResult<Option<SosContacts>>>;

    /// Save a user's SOS contacts, replacing any previous ones.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the write.
    fn save_sos_contacts<'a>(
        &'a self,
        user: &'a UserId,
        contacts: SosContacts,
    ) -> ProfileFuture<'a, ProfileResult<()>>;
}

/// In-process document store.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: DashMap<UserId, Profile>,
    sos: DashMap<UserId, SosContacts>,
}

impl InMemoryProfileStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// Profile fields may be blank; a phone, when present, must look like one.
fn validate_profile(profile: &Profile) -> ProfileResult<()> {
    let phone = profile.phone.trim();
    if !phone.is_empty() && !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ProfileError::Invalid(format!("phone has no digits: {phone}")));
    }
    Ok(())
}

impl ProfileStore for InMemoryProfileStore {
    fn profile<'a>(&'a self, user: &'a UserId) -> ProfileFuture<'a, ProfileResult<Option<Profile>>> {
        Box::pin(async move { Ok(self.profiles.get(user).map(|p| p.clone())) })
    }

    fn save_profile<'a>(&'a self, user: &'a UserId, profile: Profile) -> ProfileFuture<'a, ProfileResult<()>> {
        Box::pin(async move {
            validate_profile(&profile)?;
            self.profiles.insert(user.clone(), profile);
            Ok(())
        })
    }

    fn sos_contacts<'a>(&'a self, user: &'a UserId) -> ProfileFuture<'a, ProfileResult<Option<SosContacts>>> {
        Box::pin(async move { Ok(self.sos.get(user).map(|c| c.clone())) })
    }

    fn save_sos_contacts<'a>(
        &'a self,
        user: &'a UserId,
        contacts: SosContacts,
    ) -> ProfileFuture<'a, ProfileResult<()>> {
        Box::pin(async move {
            self.sos.insert(user.clone(), contacts);
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_profile_round_trip() {
        let store = InMemoryProfileStore::new();
        let user = UserId::new("u1");
        assert_eq!(store.profile(&user).await.expect("readable"), None);

        let profile = Profile {
            name: "Asha".to_string(),
            phone: "+91 98765 43210".to_string(),
        };
        store.save_profile(&user, profile.clone()).await.expect("saved");
        assert_eq!(store.profile(&user).await.expect("readable"), Some(profile));
    }

    #[tokio::test]
    async fn test_rejects_phone_without_digits() {
        let store = InMemoryProfileStore::new();
        let profile = Profile {
            name: "Asha".to_string(),
            phone: "call me".to_string(),
        };
        let result = store.save_profile(&UserId::new("u1"), profile).await;
        assert!(matches!(result, Err(ProfileError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_sos_contacts_replace() {
        let store = InMemoryProfileStore::new();
        let user = UserId::new("u1");
        let mut contacts = SosContacts {
            contact1_name: "A".to_string(),
            ..SosContacts::default()
        };
        store.save_sos_contacts(&user, contacts.clone()).await.expect("saved");
        contacts.contact1_name = "B".to_string();
        store.save_sos_contacts(&user, contacts.clone()).await.expect("saved");
        assert_eq!(store.sos_contacts(&user).await.expect("readable"), Some(contacts));
    }
}
