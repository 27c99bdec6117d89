//! # Service Traits
//!
//! The REST surface of the backend as a trait, so the store can be driven by
//! the real [`ApiClient`](crate::services::api::ApiClient) or by a test double.

use async_trait::async_trait;
use shared::{
    AuthResponse, Category, CategoryFilters, CategoryTreeEntry, ChangePasswordRequest,
    Conversation, ConversationResponse, CreateCategoryRequest, CreateListingRequest,
    CreatePaymentRequest, ForgotPasswordRequest, Listing, ListingFilters, ListingsResponse,
    LoginRequest, Message, MessageResponse, NotificationPreferences, NotificationSettings,
    NotificationsResponse, PageQuery, Payment, PaymentResponse, RegisterRequest,
    ResetPasswordRequest, SendMessageRequest, UpdateCategoryRequest, UpdateListingRequest,
    UpdateProfileRequest, UploadedImages, User,
};

use crate::core::error::ApiResult;
use crate::services::api::ImageUpload;

/// Every backend operation the client performs.
///
/// Calls attach the current session credential automatically; a 401 on any
/// of them ends the session as a side effect.
#[async_trait]
pub trait ApiService: Send + Sync {
    // Auth

    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse>;

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse>;

    async fn verify_email(&self, token: &str) -> ApiResult<MessageResponse>;

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<MessageResponse>;

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<MessageResponse>;

    async fn change_password(&self, request: &ChangePasswordRequest) -> ApiResult<MessageResponse>;

    async fn get_profile(&self) -> ApiResult<User>;

    /// Multipart update; `avatar` is checked against the upload limits first.
    async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
        avatar: Option<ImageUpload>,
    ) -> ApiResult<User>;

    // Listings

    async fn get_listings(&self, filters: &ListingFilters) -> ApiResult<ListingsResponse>;

    async fn get_listing(&self, id: i64) -> ApiResult<Listing>;

    async fn create_listing(&self, request: &CreateListingRequest) -> ApiResult<Listing>;

    async fn update_listing(&self, id: i64, request: &UpdateListingRequest) -> ApiResult<Listing>;

    async fn delete_listing(&self, id: i64) -> ApiResult<()>;

    /// Listings owned by the signed-in user.
    async fn get_user_listings(&self, page: &PageQuery) -> ApiResult<ListingsResponse>;

    async fn upload_images(&self, images: Vec<ImageUpload>) -> ApiResult<UploadedImages>;

    // Categories

    async fn get_categories(&self, filters: &CategoryFilters) -> ApiResult<Vec<Category>>;

    async fn get_category(&self, id: i64) -> ApiResult<Category>;

    async fn get_category_by_slug(&self, slug: &str) -> ApiResult<Category>;

    async fn get_category_tree(&self) -> ApiResult<Vec<CategoryTreeEntry>>;

    async fn create_category(&self, request: &CreateCategoryRequest) -> ApiResult<Category>;

    async fn update_category(&self, id: i64, request: &UpdateCategoryRequest) -> ApiResult<Category>;

    async fn delete_category(&self, id: i64) -> ApiResult<()>;

    // Chat

    async fn send_message(&self, request: &SendMessageRequest) -> ApiResult<Message>;

    /// One page of the conversation with `user_id`.
    async fn get_conversation(&self, user_id: i64, page: &PageQuery) -> ApiResult<ConversationResponse>;

    async fn get_conversations(&self) -> ApiResult<Vec<Conversation>>;

    async fn mark_conversation_read(&self, user_id: i64) -> ApiResult<()>;

    async fn get_unread_count(&self) -> ApiResult<u32>;

    // Notifications

    async fn get_notifications(&self, page: &PageQuery) -> ApiResult<NotificationsResponse>;

    async fn mark_notification_read(&self, id: i64) -> ApiResult<()>;

    async fn mark_all_notifications_read(&self) -> ApiResult<()>;

    async fn delete_notification(&self, id: i64) -> ApiResult<()>;

    async fn get_notification_settings(&self) -> ApiResult<NotificationSettings>;

    async fn update_notification_settings(&self, settings: &NotificationSettings) -> ApiResult<()>;

    async fn get_notification_preferences(&self) -> ApiResult<NotificationPreferences>;

    async fn update_notification_preferences(&self, preferences: &NotificationPreferences) -> ApiResult<()>;

    // Payments

    async fn create_payment(&self, request: &CreatePaymentRequest) -> ApiResult<PaymentResponse>;

    async fn get_payments(&self) -> ApiResult<Vec<Payment>>;

    async fn get_payment(&self, transaction_id: &str) -> ApiResult<Payment>;
}
