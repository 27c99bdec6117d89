//! # Notification Actions

use shared::{NotificationPreferences, NotificationSettings, PageQuery};

use crate::app::state::{AppState, RequestState};
use crate::app::Store;
use crate::core::error::ApiResult;

fn notifications_request(state: &mut AppState) -> &mut RequestState {
    &mut state.notifications.request
}

impl Store {
    pub async fn fetch_notifications(&self, page: PageQuery) -> ApiResult<()> {
        self.fetch(
            notifications_request,
            "notifications",
            self.api().get_notifications(&page),
            |s, response| s.notifications.set_page(response),
        )
        .await
    }

    pub async fn mark_notification_read(&self, id: i64) -> ApiResult<()> {
        self.mutate(
            notifications_request,
            "mark_notification_read",
            self.api().mark_notification_read(id),
            move |s, ()| s.notifications.mark_read(id, chrono::Utc::now()),
        )
        .await
    }

    pub async fn mark_all_notifications_read(&self) -> ApiResult<()> {
        self.mutate(
            notifications_request,
            "mark_all_notifications_read",
            self.api().mark_all_notifications_read(),
            |s, ()| s.notifications.mark_all_read(chrono::Utc::now()),
        )
        .await
    }

    pub async fn delete_notification(&self, id: i64) -> ApiResult<()> {
        self.mutate(
            notifications_request,
            "delete_notification",
            self.api().delete_notification(id),
            move |s, ()| s.notifications.removed(id),
        )
        .await
    }

    pub async fn fetch_notification_settings(&self) -> ApiResult<()> {
        self.fetch(
            notifications_request,
            "settings",
            self.api().get_notification_settings(),
            |s, settings| s.notifications.settings = Some(settings),
        )
        .await
    }

    /// The sent settings become current once the server accepts them.
    pub async fn update_notification_settings(&self, settings: NotificationSettings) -> ApiResult<()> {
        self.mutate(
            notifications_request,
            "update_notification_settings",
            self.api().update_notification_settings(&settings),
            move |s, ()| s.notifications.settings = Some(settings),
        )
        .await
    }

    pub async fn fetch_notification_preferences(&self) -> ApiResult<()> {
        self.fetch(
            notifications_request,
            "preferences",
            self.api().get_notification_preferences(),
            |s, preferences| s.notifications.preferences = Some(preferences),
        )
        .await
    }

    pub async fn update_notification_preferences(&self, preferences: NotificationPreferences) -> ApiResult<()> {
        self.mutate(
            notifications_request,
            "update_notification_preferences",
            self.api().update_notification_preferences(&preferences),
            move |s, ()| s.notifications.preferences = Some(preferences),
        )
        .await
    }
}
