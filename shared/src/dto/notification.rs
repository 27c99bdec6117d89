//! # Notification Data Transfer Objects
//!
//! Notifications are created by the server only. The client may mark them
//! read (one way) or delete them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pagination::PageMeta;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    Email,
    Sms,
    Push,
    InApp,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationPriority {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(alias = "userId")]
    pub recipient_id: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<NotificationChannel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub content: String,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: NotificationPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
    pub newsletter_subscribed: bool,
    pub marketing_subscribed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub new_listings: bool,
    pub new_messages: bool,
    pub payment_reminders: bool,
    pub listing_updates: bool,
    pub daily_digest: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub meta: PageMeta,
}

/// Body of both `GET` and `PUT /notifications/settings`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsEnvelope {
    pub settings: NotificationSettings,
}

/// Body of both `GET` and `PUT /notifications/preferences`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferencesEnvelope {
    pub preferences: NotificationPreferences,
}
