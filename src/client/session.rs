//! In-memory session state owned by one running client instance.

use parking_lot::RwLock;

use crate::domains::auth::models::UserSummary;

/// Signals broadcast to observers of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Refresh failed mid-use; the session has been cleared and the
    /// user must log in again.
    Unauthenticated,
}

/// Current access token and user identity.
///
/// Volatile by construction: nothing here is ever written to disk. The
/// state lives for as long as the owning `SessionClient` does.
#[derive(Debug, Default)]
pub struct SessionState {
    access_token: RwLock<Option<String>>,
    user: RwLock<Option<UserSummary>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.access_token.write() = token;
    }

    pub fn token(&self) -> Option<String> {
        self.access_token.read().clone()
    }

    pub fn set_user(&self, user: Option<UserSummary>) {
        *self.user.write() = user;
    }

    pub fn user(&self) -> Option<UserSummary> {
        self.user.read().clone()
    }

    /// Seed both token and identity after login or refresh.
    pub fn establish(&self, token: String, user: UserSummary) {
        self.set_token(Some(token));
        self.set_user(Some(user));
    }

    /// Drop the token and identity (logout or unrecoverable refresh failure).
    pub fn clear(&self) {
        self.set_token(None);
        self.set_user(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().is_some()
    }
}
