//! # Real-Time Channel Tests
//!
//! Runs the reconnecting socket against the mock backend's echo endpoint.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::*;
use serde_json::json;
use shared::{SendMessageRequest, EVENT_NEW_MESSAGE, EVENT_SEND_MESSAGE};
use toagro_client::services::realtime::ConnectionState;
use toagro_client::RealtimeChannel;

fn channel(h: &Harness) -> RealtimeChannel {
    RealtimeChannel::new(&h.config, h.session.clone(), h.events_tx.clone())
}

#[tokio::test]
async fn test_connect_requires_session() {
    // Arrange
    let h = Harness::start().await;
    let channel = channel(&h);

    // Act / Assert
    assert!(!channel.connect());
    assert_eq!(channel.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_send_while_disconnected_is_dropped() {
    // Arrange
    let h = Harness::start().await;
    h.sign_in().await;
    let channel = channel(&h);

    // Act
    let sent = channel.send(EVENT_SEND_MESSAGE, json!({ "receiverId": 2, "content": "Добрий день" }));

    // Assert
    assert!(!sent);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(h.backend.socket_frames.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_subscribers_stop_receiving_after_unsubscribe() {
    // Arrange
    let h = Harness::start().await;
    h.sign_in().await;
    let channel = channel(&h);
    let received = Arc::new(AtomicUsize::new(0));
    let counter = received.clone();
    let subscription = channel.subscribe(EVENT_NEW_MESSAGE, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(channel.connect());
    assert!(eventually(|| channel.is_connected()).await);

    // Act
    assert!(channel.send(EVENT_SEND_MESSAGE, json!({ "receiverId": 2, "content": "перше" })));
    assert!(eventually(|| received.load(Ordering::SeqCst) == 1).await);

    assert!(channel.unsubscribe(&subscription));
    assert!(channel.send(EVENT_SEND_MESSAGE, json!({ "receiverId": 2, "content": "друге" })));
    assert!(eventually(|| h.backend.socket_frames.load(Ordering::SeqCst) == 2).await);
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Assert
    assert_eq!(received.load(Ordering::SeqCst), 1);
    channel.disconnect();
}

#[tokio::test]
async fn test_pushed_messages_reach_chat_slice() {
    // Arrange
    let h = Harness::start().await;
    h.sign_in().await;
    let channel = channel(&h);
    let subscriptions = h.store.attach_realtime(&channel);
    assert!(channel.connect());
    assert!(eventually(|| channel.is_connected()).await);

    // Act
    let sent = h.store.send_message_live(
        &channel,
        &SendMessageRequest {
            receiver_id: 2,
            content: "Скільки тонн лишилось?".to_string(),
            listing_id: Some(1),
        },
    );

    // Assert
    assert!(sent);
    assert!(eventually(|| h.store.read(|s| s.chat.history(2).len() == 1)).await);
    let message = h.store.read(|s| s.chat.history(2)[0].clone());
    assert_eq!(message.content, "Скільки тонн лишилось?");

    for event in h.drain_events() {
        h.store.apply_event(&event);
    }
    assert_eq!(h.store.read(|s| s.ui.socket), ConnectionState::Connected);

    h.store.detach_realtime(&channel, &subscriptions);
    channel.disconnect();
    assert!(eventually(|| channel.state() == ConnectionState::Disconnected).await);
}

#[tokio::test]
async fn test_logout_stops_the_channel() {
    // Arrange
    let h = Harness::start().await;
    h.sign_in().await;
    let channel = channel(&h);
    assert!(channel.connect());
    assert!(eventually(|| channel.is_connected()).await);

    // Act
    h.store.logout();

    // Assert
    assert!(eventually(|| channel.state() == ConnectionState::Disconnected).await);
    assert!(!channel.send(EVENT_SEND_MESSAGE, json!({ "receiverId": 2, "content": "x" })));
}

#[tokio::test]
async fn test_dropped_socket_reconnects_until_logout() {
    // Arrange: this endpoint closes every connection right after the upgrade
    let h = Harness::start().await;
    h.sign_in().await;
    let channel = RealtimeChannel::for_namespace(&h.config, "/closing", h.session.clone(), h.events_tx.clone());
    let connections = || h.backend.socket_connections.load(Ordering::SeqCst);

    // Act
    assert!(channel.connect());
    let reconnected = eventually(|| connections() >= 3).await;
    h.store.logout();
    tokio::time::sleep(h.config.reconnect_interval * 3).await;
    let after_logout = connections();
    tokio::time::sleep(h.config.reconnect_interval * 4).await;

    // Assert
    assert!(reconnected);
    assert_eq!(connections(), after_logout);
    assert_eq!(channel.state(), ConnectionState::Disconnected);
}
