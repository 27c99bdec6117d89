//! # Notification Endpoints
//!
//! History, read flags, and the two kinds of delivery configuration:
//! per-channel settings and per-topic preferences.

use shared::{
    NotificationPreferences, NotificationSettings, NotificationsResponse, PageQuery,
    PreferencesEnvelope, SettingsEnvelope,
};

use super::client::ApiClient;
use crate::core::error::ApiResult;

pub async fn get_notifications(client: &ApiClient, page: &PageQuery) -> ApiResult<NotificationsResponse> {
    client.send_json(client.get("/notifications/history").query(page)).await
}

pub async fn mark_notification_read(client: &ApiClient, id: i64) -> ApiResult<()> {
    client
        .send_empty(client.post(&format!("/notifications/history/{id}/read")))
        .await
}

pub async fn mark_all_notifications_read(client: &ApiClient) -> ApiResult<()> {
    client.send_empty(client.post("/notifications/history/read")).await
}

pub async fn delete_notification(client: &ApiClient, id: i64) -> ApiResult<()> {
    client
        .send_empty(client.delete(&format!("/notifications/history/{id}")))
        .await
}

pub async fn get_settings(client: &ApiClient) -> ApiResult<NotificationSettings> {
    let envelope: SettingsEnvelope = client.send_json(client.get("/notifications/settings")).await?;
    Ok(envelope.settings)
}

pub async fn update_settings(client: &ApiClient, settings: &NotificationSettings) -> ApiResult<()> {
    let body = SettingsEnvelope { settings: *settings };
    client.send_empty(client.put("/notifications/settings").json(&body)).await
}

pub async fn get_preferences(client: &ApiClient) -> ApiResult<NotificationPreferences> {
    let envelope: PreferencesEnvelope = client.send_json(client.get("/notifications/preferences")).await?;
    Ok(envelope.preferences)
}

pub async fn update_preferences(client: &ApiClient, preferences: &NotificationPreferences) -> ApiResult<()> {
    let body = PreferencesEnvelope {
        preferences: *preferences,
    };
    client.send_empty(client.put("/notifications/preferences").json(&body)).await
}
