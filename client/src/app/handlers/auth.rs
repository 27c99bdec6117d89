//! # Authentication Actions
//!
//! Login, registration, session restore and logout, plus the account flows
//! that do not create a session.

use shared::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse,
    RegisterRequest, ResetPasswordRequest, UpdateProfileRequest, User,
};

use crate::app::state::{AppState, RequestState};
use crate::app::Store;
use crate::core::error::ApiResult;
use crate::services::api::ImageUpload;
use crate::services::session::Session;

fn auth_request(state: &mut AppState) -> &mut RequestState {
    &mut state.auth.request
}

impl Store {
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ApiResult<User> {
        let response = self
            .mutate(auth_request, "login", self.api().login(&request), |_, response: AuthResponse| response)
            .await?;
        Ok(self.start_session(Session::from_auth(&response), response.user))
    }

    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<User> {
        let response = self
            .mutate(auth_request, "register", self.api().register(&request), |_, response: AuthResponse| response)
            .await?;
        Ok(self.start_session(Session::from_auth(&response), response.user))
    }

    fn start_session(&self, session: Session, user: User) -> User {
        if !self.storage().set_token(&session.auth_token) {
            tracing::warn!("Session token not persisted; it will not survive a restart");
        }
        self.session().set(session);
        self.update(|s| s.auth.signed_in(user.clone()));
        tracing::info!(user_id = user.id, "Signed in");
        user
    }

    /// End the session locally: credential, persisted token and every
    /// user-scoped slice.
    pub fn logout(&self) {
        self.session().clear();
        self.storage().remove_token();
        self.update(AppState::clear_user_data);
        tracing::info!("Signed out");
    }

    /// Resume a session from the persisted token. Returns `Ok(false)` when
    /// there is nothing to restore. A rejected token is discarded; any other
    /// failure keeps it for the next attempt.
    pub async fn restore_session(&self) -> ApiResult<bool> {
        let Some(token) = self.storage().token().filter(|t| !t.is_empty()) else {
            return Ok(false);
        };
        self.session().set(Session::restored(token.clone()));
        self.update(|s| s.auth.token_restored());

        match self.load_profile().await {
            Ok(user) => {
                self.session().apply_profile(&token, &user);
                tracing::info!(user_id = user.id, "Session restored");
                Ok(true)
            }
            Err(err) => {
                if err.is_auth() {
                    self.logout();
                }
                Err(err)
            }
        }
    }

    /// `GET /auth/me` into the auth slice.
    pub async fn load_profile(&self) -> ApiResult<User> {
        self.mutate(auth_request, "load_profile", self.api().get_profile(), |s, user: User| {
            s.auth.set_user(user.clone());
            user
        })
        .await
    }

    pub async fn update_profile(&self, request: UpdateProfileRequest, avatar: Option<ImageUpload>) -> ApiResult<User> {
        self.mutate(
            auth_request,
            "update_profile",
            self.api().update_profile(&request, avatar),
            |s, user: User| {
                s.auth.set_user(user.clone());
                user
            },
        )
        .await
    }

    pub async fn change_password(&self, request: ChangePasswordRequest) -> ApiResult<()> {
        self.mutate(
            auth_request,
            "change_password",
            self.api().change_password(&request),
            |s, ack: MessageResponse| s.auth.notice = ack.message,
        )
        .await
    }

    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> ApiResult<()> {
        self.mutate(
            auth_request,
            "forgot_password",
            self.api().forgot_password(&request),
            |s, ack: MessageResponse| s.auth.notice = ack.message,
        )
        .await
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> ApiResult<()> {
        self.mutate(
            auth_request,
            "reset_password",
            self.api().reset_password(&request),
            |s, ack: MessageResponse| s.auth.notice = ack.message,
        )
        .await
    }

    pub async fn verify_email(&self, token: &str) -> ApiResult<()> {
        self.mutate(
            auth_request,
            "verify_email",
            self.api().verify_email(token),
            |s, ack: MessageResponse| {
                s.auth.notice = ack.message;
                if let Some(user) = s.auth.user.as_mut() {
                    user.is_verified = true;
                }
            },
        )
        .await
    }
}
