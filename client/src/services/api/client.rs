//! # API Client
//!
//! The single HTTP adapter every REST call goes through. It owns the
//! connection pool, attaches the session credential, and turns every
//! non-success outcome into a [`ClassifiedError`] exactly once.
//!
//! A 401 ends the session: the adapter clears it (compare-and-clear on the
//! token the request carried) and publishes [`AppEvent::SessionExpired`] plus
//! a redirect to the login view. Concurrent 401s for the same token produce
//! a single logout.

use std::borrow::Cow;

use async_channel::Sender;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    AuthResponse, Category, CategoryFilters, CategoryTreeEntry, ChangePasswordRequest,
    Conversation, ConversationResponse, CreateCategoryRequest, CreateListingRequest,
    CreatePaymentRequest, ForgotPasswordRequest, Listing, ListingFilters, ListingsResponse,
    LoginRequest, Message, MessageResponse, NotificationPreferences, NotificationSettings,
    NotificationsResponse, PageQuery, Payment, PaymentResponse, RegisterRequest,
    ResetPasswordRequest, SendMessageRequest, UpdateCategoryRequest, UpdateListingRequest,
    UpdateProfileRequest, UploadedImages, User,
};

use crate::app::events::{AppEvent, LOGIN_PATH};
use crate::config::{ClientConfig, UploadLimits};
use crate::core::error::{classify, ApiResult, ClassifiedError};
use crate::core::service::ApiService;
use crate::services::api::upload::ImageUpload;
use crate::services::api::{auth, categories, chat, listings, notifications, payments};
use crate::services::session::SessionHandle;

/// HTTP client for communicating with the backend API server.
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    session: SessionHandle,
    events: Option<Sender<AppEvent>>,
    pub(crate) uploads: UploadLimits,
}

impl ApiClient {
    /// Create a client for `config`, sharing `session` with the rest of the app.
    pub fn new(config: &ClientConfig, session: SessionHandle) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });

        Self {
            client,
            base_url: config.api_base_url.clone(),
            session,
            events: None,
            uploads: config.uploads.clone(),
        }
    }

    /// Publish session-expiry and redirect events on `events`.
    pub fn with_events(mut self, events: Sender<AppEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Escape a caller-supplied value for use as one path segment.
    pub(crate) fn segment(raw: &str) -> Cow<'_, str> {
        urlencoding::encode(raw)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::PUT, path)
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }

    /// Send and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.dispatch(builder).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, "Response parse error");
            ClassifiedError::from(e)
        })
    }

    /// Send and ignore whatever body comes back.
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> ApiResult<()> {
        self.dispatch(builder).await.map(|_| ())
    }

    async fn dispatch(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let token = self.session.token();
        let builder = match token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let start = std::time::Instant::now();
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Network error");
            ClassifiedError::Network { detail: e.to_string() }
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let duration_ms = start.elapsed().as_millis();

        if status.is_success() {
            tracing::debug!(status = status.as_u16(), path = %url, duration_ms, "Request succeeded");
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let error = classify(status.as_u16(), &body);
        tracing::warn!(
            status = status.as_u16(),
            path = %url,
            code = error.code(),
            duration_ms,
            "Request failed"
        );

        if error.is_auth() {
            self.expire_session(token.as_deref());
        }
        Err(error)
    }

    /// Global logout after a 401. Requests sent without a credential (a
    /// failed login, for one) have nothing to expire.
    fn expire_session(&self, token: Option<&str>) {
        let Some(token) = token else {
            return;
        };
        if !self.session.clear_if_token(token) {
            return;
        }
        tracing::warn!("Session rejected by server, logging out");
        if let Some(events) = &self.events {
            if events.try_send(AppEvent::SessionExpired).is_err()
                || events.try_send(AppEvent::Navigate(LOGIN_PATH.to_string())).is_err()
            {
                tracing::warn!("Event channel closed, dropping session expiry");
            }
        }
    }
}

#[async_trait::async_trait]
impl ApiService for ApiClient {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        auth::register(self, request).await
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        auth::login(self, request).await
    }

    async fn verify_email(&self, token: &str) -> ApiResult<MessageResponse> {
        auth::verify_email(self, token).await
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<MessageResponse> {
        auth::forgot_password(self, request).await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<MessageResponse> {
        auth::reset_password(self, request).await
    }

    async fn change_password(&self, request: &ChangePasswordRequest) -> ApiResult<MessageResponse> {
        auth::change_password(self, request).await
    }

    async fn get_profile(&self) -> ApiResult<User> {
        auth::get_profile(self).await
    }

    async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
        avatar: Option<ImageUpload>,
    ) -> ApiResult<User> {
        auth::update_profile(self, request, avatar).await
    }

    async fn get_listings(&self, filters: &ListingFilters) -> ApiResult<ListingsResponse> {
        listings::get_listings(self, filters).await
    }

    async fn get_listing(&self, id: i64) -> ApiResult<Listing> {
        listings::get_listing(self, id).await
    }

    async fn create_listing(&self, request: &CreateListingRequest) -> ApiResult<Listing> {
        listings::create_listing(self, request).await
    }

    async fn update_listing(&self, id: i64, request: &UpdateListingRequest) -> ApiResult<Listing> {
        listings::update_listing(self, id, request).await
    }

    async fn delete_listing(&self, id: i64) -> ApiResult<()> {
        listings::delete_listing(self, id).await
    }

    async fn get_user_listings(&self, page: &PageQuery) -> ApiResult<ListingsResponse> {
        listings::get_user_listings(self, page).await
    }

    async fn upload_images(&self, images: Vec<ImageUpload>) -> ApiResult<UploadedImages> {
        listings::upload_images(self, images).await
    }

    async fn get_categories(&self, filters: &CategoryFilters) -> ApiResult<Vec<Category>> {
        categories::get_categories(self, filters).await
    }

    async fn get_category(&self, id: i64) -> ApiResult<Category> {
        categories::get_category(self, id).await
    }

    async fn get_category_by_slug(&self, slug: &str) -> ApiResult<Category> {
        categories::get_category_by_slug(self, slug).await
    }

    async fn get_category_tree(&self) -> ApiResult<Vec<CategoryTreeEntry>> {
        categories::get_category_tree(self).await
    }

    async fn create_category(&self, request: &CreateCategoryRequest) -> ApiResult<Category> {
        categories::create_category(self, request).await
    }

    async fn update_category(&self, id: i64, request: &UpdateCategoryRequest) -> ApiResult<Category> {
        categories::update_category(self, id, request).await
    }

    async fn delete_category(&self, id: i64) -> ApiResult<()> {
        categories::delete_category(self, id).await
    }

    async fn send_message(&self, request: &SendMessageRequest) -> ApiResult<Message> {
        chat::send_message(self, request).await
    }

    async fn get_conversation(&self, user_id: i64, page: &PageQuery) -> ApiResult<ConversationResponse> {
        chat::get_conversation(self, user_id, page).await
    }

    async fn get_conversations(&self) -> ApiResult<Vec<Conversation>> {
        chat::get_conversations(self).await
    }

    async fn mark_conversation_read(&self, user_id: i64) -> ApiResult<()> {
        chat::mark_conversation_read(self, user_id).await
    }

    async fn get_unread_count(&self) -> ApiResult<u32> {
        chat::get_unread_count(self).await
    }

    async fn get_notifications(&self, page: &PageQuery) -> ApiResult<NotificationsResponse> {
        notifications::get_notifications(self, page).await
    }

    async fn mark_notification_read(&self, id: i64) -> ApiResult<()> {
        notifications::mark_notification_read(self, id).await
    }

    async fn mark_all_notifications_read(&self) -> ApiResult<()> {
        notifications::mark_all_notifications_read(self).await
    }

    async fn delete_notification(&self, id: i64) -> ApiResult<()> {
        notifications::delete_notification(self, id).await
    }

    async fn get_notification_settings(&self) -> ApiResult<NotificationSettings> {
        notifications::get_settings(self).await
    }

    async fn update_notification_settings(&self, settings: &NotificationSettings) -> ApiResult<()> {
        notifications::update_settings(self, settings).await
    }

    async fn get_notification_preferences(&self) -> ApiResult<NotificationPreferences> {
        notifications::get_preferences(self).await
    }

    async fn update_notification_preferences(&self, preferences: &NotificationPreferences) -> ApiResult<()> {
        notifications::update_preferences(self, preferences).await
    }

    async fn create_payment(&self, request: &CreatePaymentRequest) -> ApiResult<PaymentResponse> {
        payments::create_payment(self, request).await
    }

    async fn get_payments(&self) -> ApiResult<Vec<Payment>> {
        payments::get_payments(self).await
    }

    async fn get_payment(&self, transaction_id: &str) -> ApiResult<Payment> {
        payments::get_payment(self, transaction_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_cannot_escape_their_position() {
        assert_eq!(ApiClient::segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(ApiClient::segment("../admin"), "..%2Fadmin");
        assert_eq!(ApiClient::segment("tx-500"), "tx-500");
    }
}
