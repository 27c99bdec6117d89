//! # Socket Envelope
//!
//! Every WebSocket frame, inbound or outbound, is `{"event": "...", "data": {...}}`.

use serde::{Deserialize, Serialize};

/// Server pushes a freshly stored chat message.
pub const EVENT_NEW_MESSAGE: &str = "new_message";
/// Server pushes a new notification.
pub const EVENT_NOTIFICATION: &str = "notification";
/// Server pushes the current unread chat message count.
pub const EVENT_UNREAD_COUNT: &str = "unread_count";
/// Client asks the server to store and deliver a chat message.
pub const EVENT_SEND_MESSAGE: &str = "send_message";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocketEnvelope {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl SocketEnvelope {
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}
