//! # Authentication Endpoints
//!
//! Registration, login, e-mail verification, password recovery and the
//! current user's profile.

use reqwest::multipart::Form;
use shared::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse,
    ProfileResponse, RegisterRequest, ResetPasswordRequest, UpdateProfileRequest, User,
};

use super::client::ApiClient;
use super::upload::{attach_images, validate_uploads, ImageUpload};
use crate::core::error::ApiResult;

/// Sign up a new user.
#[tracing::instrument(skip(client, request), fields(email = %request.email))]
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> ApiResult<AuthResponse> {
    tracing::info!("Attempting registration");
    let response: AuthResponse = client.send_json(client.post("/auth/register").json(request)).await?;
    tracing::info!(user_id = response.user.id, "Registration successful");
    Ok(response)
}

/// Login with email and password.
#[tracing::instrument(skip(client, request), fields(email = %request.email))]
pub async fn login(client: &ApiClient, request: &LoginRequest) -> ApiResult<AuthResponse> {
    tracing::info!("Attempting login");
    let response: AuthResponse = client.send_json(client.post("/auth/login").json(request)).await?;
    tracing::info!(user_id = response.user.id, "Login successful");
    Ok(response)
}

pub async fn verify_email(client: &ApiClient, token: &str) -> ApiResult<MessageResponse> {
    client.send_json(client.get(&format!("/auth/verify/{}", ApiClient::segment(token)))).await
}

pub async fn forgot_password(client: &ApiClient, request: &ForgotPasswordRequest) -> ApiResult<MessageResponse> {
    client.send_json(client.post("/auth/forgot-password").json(request)).await
}

/// The token travels both in the path and in the body.
pub async fn reset_password(client: &ApiClient, request: &ResetPasswordRequest) -> ApiResult<MessageResponse> {
    let path = format!("/auth/reset-password/{}", ApiClient::segment(&request.token));
    client.send_json(client.post(&path).json(request)).await
}

pub async fn change_password(client: &ApiClient, request: &ChangePasswordRequest) -> ApiResult<MessageResponse> {
    client.send_json(client.post("/auth/change-password").json(request)).await
}

pub async fn get_profile(client: &ApiClient) -> ApiResult<User> {
    let response: ProfileResponse = client.send_json(client.get("/auth/me")).await?;
    Ok(response.user)
}

/// Multipart profile update with an optional `avatar` file.
pub async fn update_profile(
    client: &ApiClient,
    request: &UpdateProfileRequest,
    avatar: Option<ImageUpload>,
) -> ApiResult<User> {
    let mut form = Form::new();
    if let Some(name) = &request.name {
        form = form.text("name", name.clone());
    }
    if let Some(phone) = &request.phone_number {
        form = form.text("phoneNumber", phone.clone());
    }
    if let Some(avatar) = avatar {
        let files = vec![avatar];
        validate_uploads(&files, &client.uploads, "avatar")?;
        form = attach_images(form, "avatar", files)?;
    }

    let response: ProfileResponse = client.send_json(client.put("/auth/me").multipart(form)).await?;
    Ok(response.user)
}
