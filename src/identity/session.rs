//! Signed-in state of one chat session.
//!
//! The context is created per session and handed to whatever needs the user;
//! listeners subscribe explicitly and unsubscribe by dropping their handle.

use tokio::sync::watch;
use tracing::info;

use crate::identity::UserId;

/// Authentication state as reported by the identity backend.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum AuthState {
    /// No user is signed in.
    #[default]
    SignedOut,
    /// A user is signed in.
    SignedIn(UserId),
}

impl AuthState {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&UserId> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::SignedOut => None,
        }
    }
}

/// Injected auth context of a chat session.
#[derive(Debug)]
pub struct SessionContext {
    state: watch::Sender<AuthState>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Signed-out context.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(AuthState::SignedOut);
        Self { state }
    }

    /// Record that `user` signed in.
    pub fn sign_in(&self, user: UserId) {
        info!(%user, "session signed in");
        self.state.send_replace(AuthState::SignedIn(user));
    }

    /// Record that the user signed out.
    pub fn sign_out(&self) {
        let previous = self.state.send_replace(AuthState::SignedOut);
        if let Some(user) = previous.user() {
            info!(%user, "session signed out");
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Currently signed-in user.
    #[must_use]
    pub fn current_user(&self) -> Option<UserId> {
        self.state.borrow().user().cloned()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.receiver_count()
    }

    /// Start listening for auth changes. Drop the handle to unsubscribe.
    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.state.subscribe(),
        }
    }
}

/// Live listener on a [`SessionContext`].
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: watch::Receiver<AuthState>,
}

impl SessionSubscription {
    /// Latest state seen by this subscription.
    #[must_use]
    pub fn current(&self) -> AuthState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the context is gone.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let context = SessionContext::new();
        assert_eq!(context.current_user(), None);
        context.sign_in(UserId::new("user123"));
        assert_eq!(context.current_user(), Some(UserId::new("user123")));
        context.sign_out();
        assert_eq!(context.state(), AuthState::SignedOut);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let context = SessionContext::new();
        assert_eq!(context.subscriber_count(), 0);
        let first = context.subscribe();
        let second = context.subscribe();
        assert_eq!(context.subscriber_count(), 2);
        drop(first);
        assert_eq!(context.subscriber_count(), 1);
        drop(second);
        assert_eq!(context.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_sees_changes() {
        let context = SessionContext::new();
        let mut subscription = context.subscribe();
        context.sign_in(UserId::new("u1"));
        assert_eq!(
            subscription.changed().await,
            Some(AuthState::SignedIn(UserId::new("u1")))
        );
        assert_eq!(subscription.current(), AuthState::SignedIn(UserId::new("u1")));
    }

    #[tokio::test]
    async fn test_subscription_ends_with_context() {
        let context = SessionContext::new();
        let mut subscription = context.subscribe();
        drop(context);
        assert_eq!(subscription.changed().await, None);
    }
}
