//! # Real-Time Wiring
//!
//! Folds adapter and socket events into the store, and connects the chat
//! and notification slices to server pushes.

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    Message, MessageEnvelope, Notification, SendMessageRequest, UnreadCountResponse,
    EVENT_NEW_MESSAGE, EVENT_NOTIFICATION, EVENT_SEND_MESSAGE, EVENT_UNREAD_COUNT,
};

use crate::app::{AppEvent, AppState, Store};
use crate::services::realtime::{RealtimeChannel, Subscription};

/// Decode a push payload that may come bare or wrapped as `{ "<key>": ... }`.
fn decode_push<T: DeserializeOwned>(data: &Value, key: &str) -> Option<T> {
    serde_json::from_value(data.clone())
        .ok()
        .or_else(|| data.get(key).and_then(|inner| serde_json::from_value(inner.clone()).ok()))
}

impl Store {
    /// Apply an event from the adapter or the socket.
    pub fn apply_event(&self, event: &AppEvent) {
        match event {
            // A newer login may have landed after the expiry was queued.
            AppEvent::SessionExpired if self.session().is_authenticated() => {
                tracing::debug!("Ignoring stale session expiry");
            }
            AppEvent::SessionExpired => {
                self.storage().remove_token();
                self.update(AppState::clear_user_data);
                tracing::info!("Session expired, user data cleared");
            }
            AppEvent::SocketStatus(state) => self.update(|s| s.ui.socket = *state),
            AppEvent::Navigate(_) => {}
        }
    }

    /// Subscribe the chat and notification slices to server pushes. Keep the
    /// returned subscriptions to detach later.
    pub fn attach_realtime(&self, channel: &RealtimeChannel) -> Vec<Subscription> {
        let store = self.clone();
        let on_message = channel.subscribe(EVENT_NEW_MESSAGE, move |data| {
            let Some(message) = decode_push::<Message>(data, "message")
                .or_else(|| decode_push::<MessageEnvelope>(data, "data").map(|e| e.message))
            else {
                tracing::warn!("Ignoring malformed new_message push");
                return;
            };
            let me = store.session().current().and_then(|s| s.user_id);
            store.update(|s| s.chat.add_message(me, message));
        });

        let store = self.clone();
        let on_notification = channel.subscribe(EVENT_NOTIFICATION, move |data| {
            match decode_push::<Notification>(data, "notification") {
                Some(notification) => {
                    store.update(|s| s.notifications.push(notification));
                }
                None => tracing::warn!("Ignoring malformed notification push"),
            }
        });

        let store = self.clone();
        let on_unread = channel.subscribe(EVENT_UNREAD_COUNT, move |data| {
            let count = data
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .or_else(|| decode_push::<UnreadCountResponse>(data, "data").map(|r| r.count));
            match count {
                Some(count) => store.update(|s| s.chat.set_unread(count)),
                None => tracing::warn!("Ignoring malformed unread_count push"),
            }
        });

        vec![on_message, on_notification, on_unread]
    }

    pub fn detach_realtime(&self, channel: &RealtimeChannel, subscriptions: &[Subscription]) {
        for subscription in subscriptions {
            channel.unsubscribe(subscription);
        }
    }

    /// Best-effort send over the socket. Nothing changes locally: the
    /// message shows up when the server pushes it back as `new_message`.
    pub fn send_message_live(&self, channel: &RealtimeChannel, request: &SendMessageRequest) -> bool {
        match serde_json::to_value(request) {
            Ok(data) => channel.send(EVENT_SEND_MESSAGE, data),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode chat message");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_payload_may_be_wrapped() {
        let bare = json!({"count": 4});
        let wrapped = json!({"data": {"count": 4}});
        assert_eq!(decode_push::<UnreadCountResponse>(&bare, "data").map(|r| r.count), Some(4));
        assert_eq!(decode_push::<UnreadCountResponse>(&wrapped, "data").map(|r| r.count), Some(4));
        assert!(decode_push::<UnreadCountResponse>(&json!("x"), "data").is_none());
    }
}
