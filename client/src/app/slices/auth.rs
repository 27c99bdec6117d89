//! Signed-in user and auth form outcomes.

use shared::{Role, User};

use crate::app::state::RequestState;

#[derive(Debug, Clone, Default)]
pub struct AuthSlice {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// Confirmation text from flows that end without a session (password
    /// reset, e-mail verification).
    pub notice: Option<String>,
    pub request: RequestState,
}

impl AuthSlice {
    pub fn signed_in(&mut self, user: User) {
        self.user = Some(user);
        self.is_authenticated = true;
    }

    /// A restored token counts as authenticated before the profile arrives.
    pub fn token_restored(&mut self) {
        self.is_authenticated = true;
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn signed_out(&mut self) {
        *self = Self::default();
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }
}
