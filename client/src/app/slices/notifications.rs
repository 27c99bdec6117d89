//! # Notifications Slice
//!
//! Server-created notifications. The client only ever flips `read` from
//! false to true: a stale page that still says unread cannot undo a local
//! mark-as-read.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use shared::{Notification, NotificationPreferences, NotificationSettings, NotificationsResponse, PageMeta};

use crate::app::state::RequestState;

#[derive(Debug, Clone, Default)]
pub struct NotificationsSlice {
    pub entities: HashMap<i64, Notification>,
    /// Newest first.
    pub order: Vec<i64>,
    pub meta: Option<PageMeta>,
    pub settings: Option<NotificationSettings>,
    pub preferences: Option<NotificationPreferences>,
    pub request: RequestState,
}

impl NotificationsSlice {
    pub fn set_page(&mut self, response: NotificationsResponse) {
        self.order = response.notifications.iter().map(|n| n.id).collect();
        self.meta = Some(response.meta);
        let fresh: HashMap<i64, Notification> = response
            .notifications
            .into_iter()
            .map(|n| {
                let merged = merge_read(self.entities.get(&n.id), n);
                (merged.id, merged)
            })
            .collect();
        self.entities = fresh;
    }

    /// A pushed notification goes on top. Returns `false` for a duplicate.
    pub fn push(&mut self, notification: Notification) -> bool {
        if self.entities.contains_key(&notification.id) {
            return false;
        }
        self.order.insert(0, notification.id);
        if let Some(meta) = self.meta.as_mut() {
            *meta = PageMeta::new(meta.page, meta.limit, meta.total + 1);
        }
        self.entities.insert(notification.id, notification);
        true
    }

    pub fn mark_read(&mut self, id: i64, now: DateTime<Utc>) {
        if let Some(notification) = self.entities.get_mut(&id) {
            set_read(notification, now);
        }
    }

    pub fn mark_all_read(&mut self, now: DateTime<Utc>) {
        for notification in self.entities.values_mut() {
            set_read(notification, now);
        }
    }

    pub fn removed(&mut self, id: i64) {
        if self.entities.remove(&id).is_some() {
            self.order.retain(|x| *x != id);
            if let Some(meta) = self.meta.as_mut() {
                *meta = PageMeta::new(meta.page, meta.limit, meta.total.saturating_sub(1));
            }
        }
    }

    pub fn list(&self) -> Vec<&Notification> {
        self.order.iter().filter_map(|id| self.entities.get(id)).collect()
    }

    pub fn unread_count(&self) -> usize {
        self.entities.values().filter(|n| !n.read).count()
    }
}

fn set_read(notification: &mut Notification, now: DateTime<Utc>) {
    if !notification.read {
        notification.read = true;
        notification.read_at = Some(now);
    }
}

fn merge_read(cached: Option<&Notification>, mut incoming: Notification) -> Notification {
    if let Some(cached) = cached.filter(|c| c.read && !incoming.read) {
        incoming.read = true;
        incoming.read_at = cached.read_at;
    }
    incoming
}
