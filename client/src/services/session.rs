//! # Session Handle
//!
//! The single live session of this client. It is read by the HTTP adapter
//! (bearer token), the socket connector (query token, reconnect gating) and
//! route gates; it is written only by auth actions and by the adapter's
//! 401 handling.
//!
//! Backed by a `tokio::sync::watch` channel so the socket reconnect loop can
//! wait for "session ended" without polling.

use std::sync::Arc;

use shared::{AuthResponse, Role, User};
use tokio::sync::watch;

/// Credential plus identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// `None` only for a session restored from storage whose profile has not
    /// been fetched yet.
    pub user_id: Option<i64>,
    pub role: Role,
    pub auth_token: String,
}

impl Session {
    pub fn from_auth(response: &AuthResponse) -> Self {
        Self {
            user_id: Some(response.user.id),
            role: response.user.role,
            auth_token: response.token.clone(),
        }
    }

    /// Session rebuilt from a persisted token. Role stays `User` until the
    /// profile arrives.
    pub fn restored(token: impl Into<String>) -> Self {
        Self {
            user_id: None,
            role: Role::User,
            auth_token: token.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.auth_token.is_empty()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Cheaply clonable handle to the current session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.auth_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().as_ref().is_some_and(Session::is_authenticated)
    }

    /// Replace the session (login, registration, restore).
    pub fn set(&self, session: Session) {
        self.tx.send_replace(Some(session));
    }

    /// End the session. Returns `false` if there was none.
    pub fn clear(&self) -> bool {
        self.tx.send_if_modified(|current| current.take().is_some())
    }

    /// End the session only if it still carries `token`. Exactly one of any
    /// number of concurrent callers holding the same token gets `true`.
    pub fn clear_if_token(&self, token: &str) -> bool {
        self.tx.send_if_modified(|current| {
            if current.as_ref().is_some_and(|s| s.auth_token == token) {
                *current = None;
                true
            } else {
                false
            }
        })
    }

    /// Fill in identity from a freshly loaded profile, if the session is
    /// still the one holding `token`.
    pub fn apply_profile(&self, token: &str, user: &User) -> bool {
        self.tx.send_if_modified(|current| match current {
            Some(session) if session.auth_token == token => {
                let changed = session.user_id != Some(user.id) || session.role != user.role;
                session.user_id = Some(user.id);
                session.role = user.role;
                changed
            }
            _ => false,
        })
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}
